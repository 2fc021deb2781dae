//! Single-line text editing shared by the input dialogs
//!
//! The cursor is a character index, not a byte offset, so edits stay on
//! UTF-8 boundaries for inputs like non-ASCII folder paths.

pub struct TextField;

impl TextField {
    /// Byte offset of the character at `cursor`
    fn byte_at(input: &str, cursor: usize) -> usize {
        input
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(input.len())
    }

    /// Delete the character before the cursor
    pub fn backspace(input: &mut String, cursor: &mut usize) {
        if *cursor > 0 {
            *cursor -= 1;
            let at = Self::byte_at(input, *cursor);
            input.remove(at);
        }
    }

    /// Delete the character at the cursor
    pub fn delete(input: &mut String, cursor: usize) {
        let at = Self::byte_at(input, cursor);
        if at < input.len() {
            input.remove(at);
        }
    }

    pub fn left(cursor: &mut usize) {
        if *cursor > 0 {
            *cursor -= 1;
        }
    }

    pub fn right(input: &str, cursor: &mut usize) {
        if *cursor < input.chars().count() {
            *cursor += 1;
        }
    }

    pub fn home(cursor: &mut usize) {
        *cursor = 0;
    }

    pub fn end(input: &str, cursor: &mut usize) {
        *cursor = input.chars().count();
    }

    /// Insert a character at the cursor
    pub fn insert_char(input: &mut String, cursor: &mut usize, c: char) {
        let at = Self::byte_at(input, *cursor);
        input.insert(at, c);
        *cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut input = String::new();
        let mut cursor = 0;
        for c in "docs".chars() {
            TextField::insert_char(&mut input, &mut cursor, c);
        }
        assert_eq!(input, "docs");
        assert_eq!(cursor, 4);

        TextField::backspace(&mut input, &mut cursor);
        assert_eq!(input, "doc");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = "doc".to_string();
        let mut cursor = 0;
        TextField::backspace(&mut input, &mut cursor);
        assert_eq!(input, "doc");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_backspace_after_multibyte_char() {
        // A folder label ending in a multi-byte character
        let mut input = "/home/josé".to_string();
        let mut cursor = input.chars().count();
        TextField::backspace(&mut input, &mut cursor);
        assert_eq!(input, "/home/jos");
        assert_eq!(cursor, 9);
    }

    #[test]
    fn test_edit_around_multibyte_char() {
        let mut input = "josé".to_string();
        let mut cursor = input.chars().count();
        TextField::left(&mut cursor);
        TextField::insert_char(&mut input, &mut cursor, 'x');
        assert_eq!(input, "josxé");
        assert_eq!(cursor, 4);
        TextField::delete(&mut input, cursor);
        assert_eq!(input, "josx");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = "docs".to_string();
        TextField::delete(&mut input, 1);
        assert_eq!(input, "dcs");
        TextField::delete(&mut input, 10);
        assert_eq!(input, "dcs");
    }

    #[test]
    fn test_cursor_movement_bounds() {
        let input = "ab".to_string();
        let mut cursor = 0;
        TextField::left(&mut cursor);
        assert_eq!(cursor, 0);
        TextField::right(&input, &mut cursor);
        TextField::right(&input, &mut cursor);
        TextField::right(&input, &mut cursor);
        assert_eq!(cursor, 2);
        TextField::home(&mut cursor);
        assert_eq!(cursor, 0);
        TextField::end(&input, &mut cursor);
        assert_eq!(cursor, 2);
    }
}
