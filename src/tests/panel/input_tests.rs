use super::*;

#[test]
fn insert_advances_past_multibyte_chars() {
    let mut input = Input::default();
    input.insert_char('é');
    input.insert_char('a');
    assert_eq!(input.buf, "éa");
    assert_eq!(input.cursor, "éa".len());
}

#[test]
fn backspace_removes_a_whole_multibyte_char() {
    let mut input = Input::default();
    input.set("café".to_string());
    input.backspace();
    assert_eq!(input.buf, "caf");
    input.insert_char('e');
    assert_eq!(input.buf, "cafe");
}

#[test]
fn backspace_at_start_is_a_noop() {
    let mut input = Input::default();
    input.insert_char('x');
    input.move_left();
    input.backspace();
    assert_eq!(input.buf, "x");
    assert_eq!(input.cursor, 0);
}

#[test]
fn moves_and_delete_step_over_char_boundaries() {
    let mut input = Input::default();
    input.set("aéb".to_string());
    input.move_left();
    input.move_left();
    input.delete();
    assert_eq!(input.buf, "ab");
    assert_eq!(input.cursor, 1);
    input.move_right();
    assert_eq!(input.cursor, 2);
    input.move_right();
    assert_eq!(input.cursor, 2);
}

#[test]
fn cursor_col_counts_chars_not_bytes() {
    let mut input = Input::default();
    input.set("café".to_string());
    assert_eq!(input.cursor, "café".len());
    assert_eq!(input.cursor_col(), 4);
}
