// Integration tests for transcript parsing and rendering.
use teamsync::model::item::SYSTEM_AUTHOR;
use teamsync::model::transcript::{Transcript, count_messages, parse_transcript, render_transcript};

const EXPORT: &str = "11/14/25, 09:12 - Messages and calls are end-to-end encrypted\n\
11/14/25, 09:13 - Alice: Morning! Kickoff is on 2025-11-20\n\
11/14/25, 09:15 - Bob: Shopping list for the offsite:\n\
chairs\n\
projector\n\
11/14/25, 09:20 - Carol joined using this group's invite link\n\
11/14/25, 09:21 - Carol: Hi all";

#[test]
fn test_render_is_inverse_of_parse() {
    let messages = parse_transcript(EXPORT);
    assert_eq!(render_transcript(&messages), EXPORT);
}

#[test]
fn test_message_shapes() {
    let messages = parse_transcript(EXPORT);
    assert_eq!(messages.len(), 5);

    assert!(messages[0].is_system());
    assert_eq!(messages[3].author, SYSTEM_AUTHOR);

    assert_eq!(messages[2].author, "Bob");
    assert_eq!(
        messages[2].body,
        "Shopping list for the offsite:\nchairs\nprojector"
    );
    assert_eq!(messages[4].timestamp_text, "11/14/25, 09:21");
}

#[test]
fn test_lazy_iteration_matches_eager_parse() {
    let eager = parse_transcript(EXPORT);
    let lazy: Vec<_> = Transcript::new(EXPORT).messages().collect();
    assert_eq!(eager, lazy);

    // Taking a prefix only pulls as many lines as needed.
    let first_two: Vec<_> = Transcript::new(EXPORT).messages().take(2).collect();
    assert_eq!(first_two, eager[..2].to_vec());
}

#[test]
fn test_garbage_input_never_panics() {
    assert!(parse_transcript("").is_empty());
    assert!(parse_transcript("\n\n   \n").is_empty());
    assert!(parse_transcript("no header here\nnor here").is_empty());
}

#[test]
fn test_message_count_uses_separator_lines() {
    assert_eq!(count_messages(EXPORT), 5);
}
