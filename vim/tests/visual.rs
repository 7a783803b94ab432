use vim_modal::{Document, Engine, Mode, RegisterWise};

mod support;
use support::{MockBuffer, feed};

#[test]
fn charwise_selection_is_inclusive() {
    let mut buf = MockBuffer::new("abcdef");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "vll");
    assert_eq!(eng.mode(), Mode::Visual);
    assert_eq!(buf.selection(), (0, 3));
    feed(&mut eng, &mut buf, "d");
    assert_eq!(buf.text(), "def");
    assert_eq!(eng.mode(), Mode::Normal);
}

#[test]
fn linewise_selection_covers_whole_lines() {
    let mut buf = MockBuffer::new("abc\ndef").with_cursor(1);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "V");
    assert_eq!(eng.mode(), Mode::VisualLine);
    assert_eq!(buf.selection(), (0, 4));
}

#[test]
fn linewise_delete_fills_a_linewise_register() {
    let mut buf = MockBuffer::new("a\nb\nc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "Vjd");
    assert_eq!(buf.text(), "c");
    let reg = eng.register('"').expect("unnamed register");
    assert_eq!(reg.wise, RegisterWise::Line);
}

#[test]
fn o_swaps_the_free_end() {
    let mut buf = MockBuffer::new("abcdef");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "lvllo");
    assert_eq!(buf.position(), 1);
    assert_eq!(buf.selection(), (1, 4));
    feed(&mut eng, &mut buf, "d");
    assert_eq!(buf.text(), "aef");
}

#[test]
fn v_and_capital_v_toggle_modes() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "vV");
    assert_eq!(eng.mode(), Mode::VisualLine);
    feed(&mut eng, &mut buf, "v");
    assert_eq!(eng.mode(), Mode::Visual);
    feed(&mut eng, &mut buf, "v");
    assert_eq!(eng.mode(), Mode::Normal);
}

#[test]
fn escape_leaves_visual_mode() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "vl\x1b");
    assert_eq!(eng.mode(), Mode::Normal);
    assert_eq!(buf.selection(), (1, 1));
    assert_eq!(buf.text(), "abc");
}

#[test]
fn text_object_extends_the_selection() {
    let mut buf = MockBuffer::new("foo bar baz").with_cursor(5);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "viw");
    assert_eq!(eng.mode(), Mode::Visual);
    assert_eq!(buf.selection(), (4, 7));
    assert_eq!(buf.position(), 6);
}

#[test]
fn case_operators_on_a_selection() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "veU");
    assert_eq!(buf.text(), "FOO bar");
    assert_eq!(eng.mode(), Mode::Normal);
    feed(&mut eng, &mut buf, "v$~");
    assert_eq!(buf.text(), "foo BAR");
}

#[test]
fn put_over_a_selection_is_refused() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "ylvlp");
    assert_eq!(buf.text(), "abc");
    assert_eq!(eng.status(), Some("Put over a selection is not supported"));
}

#[test]
fn join_selected_lines() {
    let mut buf = MockBuffer::new("a\nb\nc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "VjJ");
    assert_eq!(buf.text(), "a b\nc");
    assert_eq!(eng.mode(), Mode::Normal);
}

#[test]
fn replace_every_selected_char() {
    let mut buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "vlrx");
    assert_eq!(buf.text(), "xxc");
    assert_eq!(eng.mode(), Mode::Normal);
}

#[test]
fn shift_and_comment_selected_lines() {
    let mut buf = MockBuffer::new("a\nb\nc");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "Vj>");
    assert_eq!(buf.text(), "    a\n    b\nc");

    let mut buf = MockBuffer::new("a\nb\nc");
    feed(&mut eng, &mut buf, "Vjgc");
    assert_eq!(buf.text(), "// a\n// b\nc");
}

#[test]
fn change_selection_enters_insert() {
    let mut buf = MockBuffer::new("foo bar");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "vec");
    assert_eq!(eng.mode(), Mode::Insert);
    feed(&mut eng, &mut buf, "baz\x1b");
    assert_eq!(buf.text(), "baz bar");
}

#[test]
fn escape_inside_a_pending_command_leaves_visual() {
    for keys in ["vlf\x1b", "vli\x1b", "vl\"\x1b", "vlS\x1b", "Vt\x1b"] {
        let mut buf = MockBuffer::new("abcdef");
        let mut eng = Engine::new();

        feed(&mut eng, &mut buf, keys);
        assert_eq!(eng.mode(), Mode::Normal, "after {keys:?}");
        let pos = buf.position();
        assert_eq!(buf.selection(), (pos, pos), "after {keys:?}");
        assert_eq!(buf.text(), "abcdef");
    }
}

#[test]
fn charwise_delete_across_lines_reports_fewer_lines() {
    let mut buf = MockBuffer::new("a\nb\nc\nd\ne");
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "v3jd");
    assert_eq!(buf.text(), "\ne");
    assert_eq!(eng.status(), Some("3 fewer lines"));
}

#[test]
fn text_object_from_linewise_selection_switches_to_charwise() {
    let mut buf = MockBuffer::new("foo bar baz").with_cursor(5);
    let mut eng = Engine::new();

    feed(&mut eng, &mut buf, "Viw");
    assert_eq!(eng.mode(), Mode::Visual);
    assert_eq!(buf.selection(), (4, 7));
    feed(&mut eng, &mut buf, "d");
    assert_eq!(buf.text(), "foo  baz");
}
