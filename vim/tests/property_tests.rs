use proptest::prelude::*;
use vim_modal::motion;
use vim_modal::operator::resolve_span;
use vim_modal::{Document, Engine, Jump, JumpList, MotionResult};

mod support;
use support::{MockBuffer, feed};

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,30}",
        "[a-zA-Z0-9_.,;()]{1,20}( [a-zA-Z0-9_.,;()]{1,10}){0,4}",
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z .]{0,40}",
        "[a-z .\n]{0,80}",
        r"[a-z ]{0,20}\n\n[a-z ]{0,20}\n",
        "[ \t]{0,6}[a-z]{0,10}\n[ \t]{0,6}[a-z]{0,10}",
    ]
}

/// Every motion the pure motion functions expose, at one cursor and count.
fn all_motions(doc: &dyn Document, pos: usize, count: usize) -> Vec<MotionResult> {
    vec![
        motion::left(doc, pos, count),
        motion::right(doc, pos, count),
        motion::down(doc, pos, count, 3),
        motion::up(doc, pos, count, 3),
        motion::word_forward(doc, pos, count, false),
        motion::word_forward_delete(doc, pos, count, true),
        motion::word_backward(doc, pos, count, false),
        motion::word_end(doc, pos, count, false),
        motion::word_end_backward(doc, pos, count, true),
        motion::line_start(doc, pos),
        motion::first_non_blank_of(doc, pos),
        motion::line_end(doc, pos, count),
        motion::next_line_start(doc, pos, count),
        motion::paragraph_forward(doc, pos, count),
        motion::paragraph_backward(doc, pos, count),
        motion::match_pair(doc, pos),
    ]
}

fn delete_motion(doc: &dyn Document, pos: usize, key: char) -> MotionResult {
    match key {
        'h' => motion::left(doc, pos, 1),
        'l' => motion::right(doc, pos, 1),
        'w' => motion::word_forward_delete(doc, pos, 1, false),
        'b' => motion::word_backward(doc, pos, 1, false),
        'e' => motion::word_end(doc, pos, 1, false),
        '$' => motion::line_end(doc, pos, 1),
        _ => motion::line_start(doc, pos),
    }
}

proptest! {
    #[test]
    fn motions_are_pure(text in text_strategy(), seed in any::<usize>(), count in 1usize..4) {
        let buf = MockBuffer::new(&text);
        let pos = if text.is_empty() { 0 } else { seed % buf.len() };

        let first = all_motions(&buf, pos, count);
        let second = all_motions(&buf, pos, count);
        prop_assert_eq!(first, second);
        prop_assert_eq!(buf.text(), text);
    }

    #[test]
    fn delete_removes_exactly_the_motion_range(
        text in line_strategy(),
        seed in any::<usize>(),
        key in prop::sample::select(vec!['h', 'l', 'w', 'b', 'e', '$', '0']),
    ) {
        let mut buf = MockBuffer::new(&text);
        let pos = seed % buf.len();
        buf.set_position(pos);

        let result = delete_motion(&buf, pos, key);
        let span = resolve_span(&buf, pos, &result).expect("single-line motions succeed");
        let chars: Vec<char> = text.chars().collect();
        let expected: String = chars[..span.start].iter().chain(&chars[span.end..]).collect();

        let mut eng = Engine::new();
        feed(&mut eng, &mut buf, &format!("d{key}"));

        if span.is_empty() {
            prop_assert_eq!(buf.text(), text);
        } else {
            prop_assert_eq!(buf.text(), expected);
            let removed: String = chars[span.start..span.end].iter().collect();
            prop_assert_eq!(eng.register('"').map(|r| r.content), Some(removed));
            prop_assert_eq!(buf.position(), span.start.min(buf.len().saturating_sub(1)));
        }
    }

    #[test]
    fn yanks_fill_register_zero_and_deletes_leave_it(
        text in line_strategy(),
        seed in any::<usize>(),
        yank in prop::sample::select(vec!["yw", "ye", "y$", "yl", "yy", "yb"]),
    ) {
        let mut buf = MockBuffer::new(&text);
        buf.set_position(seed % buf.len());
        let mut eng = Engine::new();

        feed(&mut eng, &mut buf, yank);
        let zero = eng.register('0').map(|r| r.content);
        prop_assert_eq!(zero.clone(), eng.register('"').map(|r| r.content));

        feed(&mut eng, &mut buf, "x");
        prop_assert_eq!(eng.register('0').map(|r| r.content), zero);
    }

    #[test]
    fn jump_list_back_then_forward_round_trips(
        positions in prop::collection::vec(0usize..50, 1..20),
        steps in 0usize..25,
    ) {
        let mut jumps = JumpList::with_capacity(10);
        for position in positions {
            jumps.push(Jump::new("main.rs", position));
        }
        let before = jumps.clone();
        for _ in 0..steps {
            jumps.back();
        }
        for _ in 0..steps {
            jumps.forward();
        }
        prop_assert_eq!(jumps, before);
    }

    #[test]
    fn dot_repeats_a_word_change_like_a_direct_edit(
        words in prop::collection::vec("[a-z]{1,6}", 3..6),
    ) {
        let text = words.join(" ");
        let mut repeated = MockBuffer::new(&text);
        let mut eng = Engine::new();
        feed(&mut eng, &mut repeated, "cwX\x1bw.");

        let mut direct = MockBuffer::new(&text);
        let mut eng = Engine::new();
        feed(&mut eng, &mut direct, "cwX\x1bwcwX\x1b");

        prop_assert_eq!(repeated.text(), direct.text());
    }
}

#[test]
fn jump_list_scenario() {
    let mut jumps = JumpList::default();
    jumps.push(Jump::new("main.rs", 0));
    jumps.push(Jump::new("main.rs", 50));
    assert_eq!(jumps.back().map(|j| j.position), Some(0));
    assert_eq!(jumps.forward().map(|j| j.position), Some(50));
}
