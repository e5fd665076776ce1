//! WhatsApp-style chat export parser (text).
//!
//! Exports are line oriented: a message starts with `DATE, TIME - REST`
//! and every line not matching that prefix continues the previous
//! message. Expected shape:
//!
//!   3/5/24, 9:00 PM - Alice: Saved 160 Tk
//!   3/5/24, 9:02 PM - Messages and calls are end-to-end encrypted.
//!   and this line continues the encryption notice

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ChatMessage;

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}/\d{1,2}/\d{2}),\s+(\d{1,2}:\d{2}\s*[AP]M) - (.*)$").unwrap()
});

/// Parse a full chat export into its ordered message sequence.
///
/// Pure function of the input text; the whole export must be available.
/// Lines before the first date prefix are dropped.
pub fn parse_chat_export(text: &str) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut current: Option<ChatMessage> = None;

    for raw in text.lines() {
        // Exports sprinkle narrow no-break spaces and LTR marks into
        // timestamps; normalize before matching. A leading BOM on the
        // first line is stripped the same way.
        let line = raw
            .trim_start_matches('\u{feff}')
            .replace('\u{202f}', " ")
            .replace('\u{200e}', "");

        if let Some(caps) = DATE_PREFIX.captures(&line) {
            if let Some(done) = current.take() {
                messages.push(done);
            }

            let rest = &caps[3];
            let (sender, body) = match rest.split_once(": ") {
                Some((s, t)) => {
                    let s = s.trim();
                    ((!s.is_empty()).then(|| s.to_string()), t.trim().to_string())
                }
                None => (None, rest.trim().to_string()),
            };

            current = Some(ChatMessage {
                date: caps[1].trim().to_string(),
                time: caps[2].trim().to_uppercase(),
                sender,
                text: body,
            });
        } else if let Some(msg) = current.as_mut() {
            msg.text.push(' ');
            msg.text.push_str(line.trim());
        }
    }

    if let Some(done) = current {
        messages.push(done);
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_exchange() {
        let text = "3/5/24, 9:00 PM - Alice: Saved 160 Tk\n\
                    3/5/24, 9:05 PM - Bob: 200\n";

        let msgs = parse_chat_export(text);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].date, "3/5/24");
        assert_eq!(msgs[0].time, "9:00 PM");
        assert_eq!(msgs[0].sender.as_deref(), Some("Alice"));
        assert_eq!(msgs[0].text, "Saved 160 Tk");
        assert_eq!(msgs[1].sender.as_deref(), Some("Bob"));
        assert_eq!(msgs[1].text, "200");
    }

    #[test]
    fn test_continuation_lines_fold_into_text() {
        let text = "3/5/24, 9:00 PM - Alice: Saved 160 Tk\n\
                    from skipping lunch\n\
                    and bus fare\n\
                    3/6/24, 8:00 AM - Bob: hello";

        let msgs = parse_chat_export(text);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text, "Saved 160 Tk from skipping lunch and bus fare");
    }

    #[test]
    fn test_system_line_has_no_sender() {
        let text = "3/5/24, 9:00 PM - Messages and calls are end-to-end encrypted.";

        let msgs = parse_chat_export(text);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].sender, None);
        assert_eq!(msgs[0].text, "Messages and calls are end-to-end encrypted.");
    }

    #[test]
    fn test_narrow_nbsp_and_ltr_marks_are_normalized() {
        // WhatsApp emits U+202F between time and AM/PM and U+200E before
        // some senders.
        let text = "3/5/24, 9:00\u{202f}PM - \u{200e}Alice: Saved 160 Tk";

        let msgs = parse_chat_export(text);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].time, "9:00 PM");
        assert_eq!(msgs[0].sender.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_lowercase_meridiem_is_uppercased() {
        let msgs = parse_chat_export("3/5/24, 9:00 pm - Alice: 200");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].time, "9:00 PM");
    }

    #[test]
    fn test_leading_noise_before_first_message_is_dropped() {
        let text = "stray line\n3/5/24, 9:00 PM - Alice: 200";
        let msgs = parse_chat_export(text);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, "200");
    }

    #[test]
    fn test_colon_in_body_does_not_split_twice() {
        let msgs = parse_chat_export("3/5/24, 9:00 PM - Alice: note: saved 160 tk");
        assert_eq!(msgs[0].sender.as_deref(), Some("Alice"));
        assert_eq!(msgs[0].text, "note: saved 160 tk");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_chat_export("").is_empty());
    }

    #[test]
    fn test_tokenized_text_preserves_continuation_content() {
        let text = "3/5/24, 9:00 PM - Alice: part one\n  part two  \npart three";
        let msgs = parse_chat_export(text);
        assert_eq!(msgs[0].text, "part one part two part three");
    }
}
