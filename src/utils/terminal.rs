//! Terminal output sanitization
//!
//! Message content comes from the conversation service (and, for assistant replies, from a
//! model) and is printed straight to the terminal by the CLI. Escape sequences inside it could
//! clear the screen, move the cursor, retitle the window or forge hyperlinks, so every piece of
//! message text goes through [`sanitize_for_terminal`] before it is written.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strips ANSI CSI and OSC sequences plus other control characters.
///
/// Tab, newline and carriage return are kept so multi-paragraph replies keep their layout.
///
/// # Examples
///
/// ```
/// use chat_sync::utils::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m reply"), "Red reply");
/// assert_eq!(sanitize_for_terminal("\x1b]0;pwned\x07title"), "title");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.peek() {
                // CSI: ESC [ params final-letter
                Some('[') => {
                    chars.next();
                    for next_ch in chars.by_ref() {
                        if next_ch.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                // OSC: ESC ] payload (BEL | ESC \)
                Some(']') => {
                    chars.next();
                    while let Some(next_ch) = chars.next() {
                        if next_ch == BEL {
                            break;
                        }
                        if next_ch == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}
