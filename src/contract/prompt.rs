// File: ./src/contract/prompt.rs
use chrono::NaiveDate;

pub const SECTION_DELIMITER: &str = "===";
pub const TODOS_HEADER: &str = "=== TODOS ===";
pub const DATES_HEADER: &str = "=== DATES ===";
pub const NO_TODOS_SENTINEL: &str = "No action items found.";
pub const NO_DATES_SENTINEL: &str = "No dates found.";
pub const DATE_MARKER: &str = "DATE:";
pub const EVENT_MARKER: &str = "EVENT:";
pub const TBD: &str = "TBD";

/// Content shorter than this (after trimming) counts as "no chat uploaded".
const MIN_CHAT_CHARS: usize = 10;

/// One request asking for both the todo and the dates section.
pub fn build_extraction_prompt(transcript: &str, today: NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    format!(
        "You are TeamSync, a productivity AI assistant.\n\
         \n\
         Today's date is {today}. Resolve relative expressions such as \"tomorrow\" or \
         \"next Monday\" against this date before writing any date.\n\
         \n\
         Analyze the following group chat. Identify every action item, task and decision, \
         and every important date, deadline and scheduled event that is clearly mentioned.\n\
         \n\
         <chat>\n\
         {transcript}\n\
         </chat>\n\
         \n\
         Respond with exactly two sections, in this order:\n\
         \n\
         {TODOS_HEADER}\n\
         - First action item\n\
         - Second action item\n\
         (If there are no action items, write: \"{NO_TODOS_SENTINEL}\")\n\
         \n\
         {DATES_HEADER}\n\
         {DATE_MARKER} [date in YYYY-MM-DD format, or \"{TBD}\" if unclear] | {EVENT_MARKER} [short summary of the event]\n\
         \n\
         Examples:\n\
         {DATE_MARKER} 2025-11-15 | {EVENT_MARKER} Hackathon event\n\
         {DATE_MARKER} 2025-11-20 | {EVENT_MARKER} Project deadline\n\
         {DATE_MARKER} {TBD} | {EVENT_MARKER} Team meeting to be scheduled\n\
         (If there are no dates, write: \"{NO_DATES_SENTINEL}\")\n"
    )
}

/// Prompt for the conversational path. Falls back to a general-assistant
/// variant when no meaningful chat content is loaded.
pub fn build_chat_prompt(chat_content: &str, question: &str, history: &str) -> String {
    let history_block = if history.is_empty() {
        String::new()
    } else {
        format!("\nPrevious conversation:\n{history}\n")
    };

    if has_chat_data(chat_content) {
        format!(
            "You are TeamSync, a helpful AI assistant that analyzes group chats and helps with productivity.\n\
             {history_block}\n\
             Based on the following chat data:\n\
             \n\
             <chat>\n\
             {chat_content}\n\
             </chat>\n\
             \n\
             User: {question}\n\
             \n\
             Answer concisely and naturally. If the question is not related to the chat, answer it \
             normally but bring it back to the chat analysis where relevant."
        )
    } else {
        format!(
            "You are TeamSync, a helpful productivity AI assistant.\n\
             {history_block}\n\
             User: {question}\n\
             \n\
             Note: No chat data has been uploaded yet. If the user asks about analyzing chats, \
             extracting todos, or calendar events from messages, tell them to upload a chat file \
             first. Otherwise, have a normal conversation and help with their questions."
        )
    }
}

pub fn has_chat_data(chat_content: &str) -> bool {
    chat_content.trim().chars().count() > MIN_CHAT_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_carries_contract_markers() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let p = build_extraction_prompt("12/1/25, 10:01 - Bob: hi", today);
        assert!(p.contains("2025-11-15"));
        assert!(p.contains(TODOS_HEADER));
        assert!(p.contains(DATES_HEADER));
        assert!(p.contains("DATE: 2025-11-20 | EVENT: Project deadline"));
        assert!(p.contains(NO_TODOS_SENTINEL));
        assert!(p.contains(NO_DATES_SENTINEL));
        assert!(p.contains("<chat>\n12/1/25, 10:01 - Bob: hi\n</chat>"));
    }

    #[test]
    fn test_chat_prompt_variants() {
        let with = build_chat_prompt("12/1/25, 10:01 - Bob: ship it friday", "when?", "");
        assert!(with.contains("<chat>"));
        assert!(!with.contains("Previous conversation"));

        let without = build_chat_prompt("   short  ", "hello", "User: a\nAssistant: b");
        assert!(!without.contains("<chat>"));
        assert!(without.contains("upload a chat file"));
        assert!(without.contains("Previous conversation:\nUser: a\nAssistant: b"));
    }
}
