use vim_modal::{Document, Engine, Mode, RegisterWise};

mod support;
use support::{MockBuffer, feed};

fn unnamed(eng: &mut Engine) -> Option<String> {
    eng.register('"').map(|r| r.content)
}

#[test]
fn dw_deletes_word_and_trailing_space() {
    let mut buf = MockBuffer::new("hello world");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "dw");
    assert_eq!(buf.text(), "world");
    assert_eq!(buf.position(), 0);
    assert_eq!(unnamed(&mut eng).as_deref(), Some("hello "));
}

#[test]
fn dw_on_last_word_stops_at_line_end() {
    let mut buf = MockBuffer::new("foo bar\nbaz").with_cursor(4);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "dw");
    assert_eq!(buf.text(), "foo \nbaz");
}

#[test]
fn counts_multiply_across_operator_and_motion() {
    let mut buf = MockBuffer::new("a b c d e f g h");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "2d3w");
    assert_eq!(buf.text(), "g h");
}

#[test]
fn de_is_inclusive() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "de");
    assert_eq!(buf.text(), " bar");
}

#[test]
fn dd_deletes_lines_into_a_linewise_register() {
    let mut buf = MockBuffer::new("one\ntwo\nthree\n").with_cursor(4);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "dd");
    assert_eq!(buf.text(), "one\nthree\n");
    assert_eq!(buf.position(), 4);
    let reg = eng.register('"').expect("unnamed register");
    assert_eq!(reg.content, "two\n");
    assert_eq!(reg.wise, RegisterWise::Line);
}

#[test]
fn dd_on_last_line_takes_the_previous_terminator() {
    let mut buf = MockBuffer::new("one\ntwo").with_cursor(5);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "dd");
    assert_eq!(buf.text(), "one");
    assert_eq!(buf.position(), 0);
}

#[test]
fn counted_dd_and_dg() {
    let mut buf = MockBuffer::new("a\nb\nc\nd");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "2dd");
    assert_eq!(buf.text(), "c\nd");

    feed(&mut eng, &mut buf, "dG");
    assert_eq!(buf.text(), "");
}

#[test]
fn gu_uppercases_the_line() {
    let mut buf = MockBuffer::new("abcde");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "gUU");
    assert_eq!(buf.text(), "ABCDE");
    assert_eq!(buf.position(), 0);

    let mut upper = MockBuffer::new("ABCDE");
    feed(&mut eng, &mut upper, "gUU");
    assert_eq!(upper.text(), "ABCDE");
}

#[test]
fn case_operators_with_motions() {
    let mut buf = MockBuffer::new("Hello World");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "guw");
    assert_eq!(buf.text(), "hello World");
    feed(&mut eng, &mut buf, "w");
    feed(&mut eng, &mut buf, "g~e");
    assert_eq!(buf.text(), "hello wORLD");
    feed(&mut eng, &mut buf, "gugu");
    assert_eq!(buf.text(), "hello world");
}

#[test]
fn tilde_toggles_and_advances() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "~");
    assert_eq!(buf.text(), "Abc");
    assert_eq!(buf.position(), 1);
    feed(&mut eng, &mut buf, "2~");
    assert_eq!(buf.text(), "ABC");
    assert_eq!(buf.position(), 2);
}

#[test]
fn x_and_capital_x() {
    let mut buf = MockBuffer::new("abcd").with_cursor(1);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "x");
    assert_eq!(buf.text(), "acd");
    assert_eq!(unnamed(&mut eng).as_deref(), Some("b"));
    feed(&mut eng, &mut buf, "X");
    assert_eq!(buf.text(), "cd");
    assert_eq!(buf.position(), 0);
}

#[test]
fn x_at_line_end_clamps_cursor() {
    let mut buf = MockBuffer::new("abc").with_cursor(2);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "x");
    assert_eq!(buf.text(), "ab");
    assert_eq!(buf.position(), 1);
}

#[test]
fn d_and_c_to_line_end() {
    let mut buf = MockBuffer::new("hello world").with_cursor(6);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "D");
    assert_eq!(buf.text(), "hello ");
    assert_eq!(buf.position(), 5);

    let mut buf = MockBuffer::new("hello world").with_cursor(6);
    feed(&mut eng, &mut buf, "Cthere\x1b");
    assert_eq!(buf.text(), "hello there");
    assert_eq!(eng.mode(), Mode::Normal);
}

#[test]
fn cw_changes_to_word_end() {
    let mut buf = MockBuffer::new("hello world");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "cw");
    assert_eq!(eng.mode(), Mode::Insert);
    assert_eq!(buf.text(), " world");
    feed(&mut eng, &mut buf, "FOO\x1b");
    assert_eq!(buf.text(), "FOO world");
    assert_eq!(eng.mode(), Mode::Normal);
    assert_eq!(buf.position(), 2);
}

#[test]
fn cc_keeps_an_empty_line() {
    let mut buf = MockBuffer::new("one\ntwo\nthree").with_cursor(4);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "ccTWO\x1b");
    assert_eq!(buf.text(), "one\nTWO\nthree");
}

#[test]
fn indent_and_unindent_lines() {
    let mut buf = MockBuffer::new("a\nb");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, ">>");
    assert_eq!(buf.text(), "    a\nb");
    assert_eq!(buf.position(), 4);
    feed(&mut eng, &mut buf, ">j");
    assert_eq!(buf.text(), "        a\n    b");
    feed(&mut eng, &mut buf, "<<");
    assert_eq!(buf.text(), "    a\n    b");
}

#[test]
fn join_lines_with_single_spaces() {
    let mut buf = MockBuffer::new("a\n  b\nc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "J");
    assert_eq!(buf.text(), "a b\nc");
    assert_eq!(buf.position(), 1);
    feed(&mut eng, &mut buf, "J");
    assert_eq!(buf.text(), "a b c");
}

#[test]
fn join_on_last_line_does_nothing() {
    let mut buf = MockBuffer::new("a\nb\n").with_cursor(2);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "J");
    assert_eq!(buf.text(), "a\nb\n");
}

#[test]
fn replace_characters() {
    let mut buf = MockBuffer::new("abcd");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "rx");
    assert_eq!(buf.text(), "xbcd");
    feed(&mut eng, &mut buf, "l2ry");
    assert_eq!(buf.text(), "xyyd");
    assert_eq!(buf.position(), 2);
    feed(&mut eng, &mut buf, "5rz");
    assert_eq!(buf.text(), "xyyd");
}

#[test]
fn comment_operator_toggles_lines() {
    let mut buf = MockBuffer::new("a\nb\nc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "gcc");
    assert_eq!(buf.text(), "// a\nb\nc");
    feed(&mut eng, &mut buf, "gcj");
    assert_eq!(buf.text(), "a\n// b\nc");
}

#[test]
fn failed_motion_aborts_without_touching_registers() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "dfz");
    assert_eq!(buf.text(), "abc");
    assert_eq!(unnamed(&mut eng), None);
    assert!(eng.last_change().is_none());
}

#[test]
fn undo_and_redo_are_delegated() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "x");
    assert_eq!(buf.text(), "bc");
    feed(&mut eng, &mut buf, "u");
    assert_eq!(buf.text(), "abc");
    feed(&mut eng, &mut buf, "\x12");
    assert_eq!(buf.text(), "bc");
}

#[test]
fn replacements_undo_in_one_step() {
    for (text, keys, changed) in [
        ("abc", "rx", "xbc"),
        ("abc", "~", "Abc"),
        ("foo bar", "gUiw", "FOO bar"),
        ("foo bar", "v~", "Foo bar"),
    ] {
        let mut buf = MockBuffer::new(text);
        let mut eng = Engine::new();

        feed(&mut eng, &mut buf, keys);
        assert_eq!(buf.text(), changed, "after {keys:?}");
        feed(&mut eng, &mut buf, "u");
        assert_eq!(buf.text(), text, "undo after {keys:?}");
    }
}

#[test]
fn insert_entries() {
    let mut buf = MockBuffer::new("  abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "I>\x1b");
    assert_eq!(buf.text(), "  >abc");
    feed(&mut eng, &mut buf, "A!\x1b");
    assert_eq!(buf.text(), "  >abc!");
    assert_eq!(buf.position(), 6);
    feed(&mut eng, &mut buf, "0ax\x1b");
    assert_eq!(buf.text(), " x >abc!");
    feed(&mut eng, &mut buf, "oend\x1b");
    assert_eq!(buf.text(), " x >abc!\nend");
    feed(&mut eng, &mut buf, "Otop\x1b");
    assert_eq!(buf.text(), " x >abc!\ntop\nend");
}

#[test]
fn insert_mode_editing_keys() {
    let mut buf = MockBuffer::new("");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "iab\x08c\nd\x1b");
    assert_eq!(buf.text(), "ac\nd");
    assert_eq!(eng.mode(), Mode::Normal);
}
