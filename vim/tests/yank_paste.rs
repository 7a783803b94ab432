use vim_modal::{Document, Engine, RegisterWise, Registers};

mod support;
use support::{MockBuffer, MockClipboard, feed};

fn content(eng: &mut Engine, name: char) -> Option<String> {
    eng.register(name).map(|r| r.content)
}

#[test]
fn yank_word_then_put_before() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "yw");
    assert_eq!(buf.text(), "foo bar");
    assert_eq!(content(&mut eng, '"').as_deref(), Some("foo "));
    feed(&mut eng, &mut buf, "P");
    assert_eq!(buf.text(), "foo foo bar");
    assert_eq!(buf.position(), 3);
}

#[test]
fn put_after_cursor_with_count() {
    let mut buf = MockBuffer::new("ab");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "yl3p");
    assert_eq!(buf.text(), "aaaab");
    assert_eq!(buf.position(), 3);
}

#[test]
fn yank_line_then_put_below_and_above() {
    let mut buf = MockBuffer::new("a\nb\n");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "yy");
    let reg = eng.register('"').expect("unnamed register");
    assert_eq!(reg.content, "a\n");
    assert_eq!(reg.wise, RegisterWise::Line);

    feed(&mut eng, &mut buf, "p");
    assert_eq!(buf.text(), "a\na\nb\n");
    assert_eq!(buf.position(), 2);

    feed(&mut eng, &mut buf, "jP");
    assert_eq!(buf.text(), "a\na\na\nb\n");
    assert_eq!(buf.position(), 4);
}

#[test]
fn put_line_below_last_line_without_terminator() {
    let mut buf = MockBuffer::new("a\nb").with_cursor(2);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "Yp");
    assert_eq!(buf.text(), "a\nb\nb");
    assert_eq!(buf.position(), 4);
}

#[test]
fn yank_fills_register_zero_but_delete_does_not() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "yw");
    assert_eq!(content(&mut eng, '0'), content(&mut eng, '"'));
    feed(&mut eng, &mut buf, "x");
    assert_eq!(content(&mut eng, '"').as_deref(), Some("f"));
    assert_eq!(content(&mut eng, '0').as_deref(), Some("foo "));
}

#[test]
fn named_registers_and_append() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "\"ayw");
    assert_eq!(content(&mut eng, 'a').as_deref(), Some("foo "));
    feed(&mut eng, &mut buf, "w\"Ayw");
    assert_eq!(content(&mut eng, 'a').as_deref(), Some("foo bar"));

    feed(&mut eng, &mut buf, "x0\"ap");
    assert_eq!(buf.text(), "ffoo baroo ar");
}

#[test]
fn register_prefix_applies_to_one_command() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "\"bx");
    assert_eq!(eng.snapshot().pending_register, None);
    feed(&mut eng, &mut buf, "x");
    assert_eq!(content(&mut eng, 'b').as_deref(), Some("a"));
    assert_eq!(content(&mut eng, '"').as_deref(), Some("b"));
}

#[test]
fn invalid_register_name_is_reported() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "\"!");
    assert!(eng.status().is_some_and(|s| s.contains("invalid register")));
    assert_eq!(eng.snapshot().pending_register, None);
    assert!(!Registers::is_valid('!'));
}

#[test]
fn plus_register_goes_through_the_clipboard() {
    let clipboard = MockClipboard::new();
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::builder().clipboard(Box::new(clipboard.clone())).build();

    feed(&mut eng, &mut buf, "\"+yw");
    assert_eq!(clipboard.contents().as_deref(), Some("foo "));

    clipboard.put("baz\n");
    feed(&mut eng, &mut buf, "\"+p");
    assert_eq!(buf.text(), "foo bar\nbaz");
}

#[test]
fn put_from_empty_register_reports() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "\"zp");
    assert_eq!(buf.text(), "abc");
    assert!(eng.status().is_some_and(|s| s.contains("Nothing in register")));
}

#[test]
fn yank_highlights_the_range() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "ye");
    assert_eq!(buf.highlights, vec![(0, 3)]);
}

#[test]
fn visual_yank_returns_to_start() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "wvey");
    assert_eq!(content(&mut eng, '"').as_deref(), Some("bar"));
    assert_eq!(buf.position(), 4);
    assert_eq!(eng.mode(), vim_modal::Mode::Normal);
}
