//! Source lint for `src/adventure/render.rs`.
//!
//! A `[k]` key hint on screen must be tappable. Key hints may only appear in
//! lines handed to `push_clickable`, which `push_choice` and `push_choice_dim`
//! wrap. A plain `ClickableList::push` with a key hint is flagged, including
//! calls split over several source lines.
//!
//! Every action ID in `actions.rs` must also be drawn somewhere, or the
//! matching engine operation is reachable by keyboard only.

use std::fs;
use std::path::Path;

fn read_src(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(rel);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// A key hint: `[` + one key + `]`, or the `[{}]` template the choice helpers format.
fn has_key_hint(text: &str) -> bool {
    if text.contains("[{}]") {
        return true;
    }
    text.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'[' && w[2] == b']' && w[1].is_ascii_alphanumeric())
}

/// Plain `.push(` calls, joined across lines until their parentheses close.
/// Returns the starting line number and the joined call text.
fn plain_push_calls(source: &str) -> Vec<(usize, String)> {
    let mut calls = Vec::new();
    let mut open: Option<(usize, String, i32)> = None;

    for (idx, line) in source.lines().enumerate() {
        let code = line.trim();
        if code.starts_with("//") {
            continue;
        }
        if open.is_none() {
            let Some(at) = code.find(".push(") else {
                continue;
            };
            let rest = &code[at..];
            match paren_balance(rest) {
                d if d <= 0 => calls.push((idx + 1, rest.to_string())),
                d => open = Some((idx + 1, rest.to_string(), d)),
            }
            continue;
        }
        let (start, text, depth) = open.as_mut().unwrap();
        text.push(' ');
        text.push_str(code);
        *depth += paren_balance(code);
        if *depth <= 0 {
            calls.push((*start, std::mem::take(text)));
            open = None;
        }
    }
    calls
}

fn paren_balance(code: &str) -> i32 {
    code.chars().fold(0, |n, c| match c {
        '(' => n + 1,
        ')' => n - 1,
        _ => n,
    })
}

fn unclickable_key_hints(source: &str) -> Vec<(usize, String)> {
    plain_push_calls(source)
        .into_iter()
        .filter(|(_, call)| has_key_hint(call))
        .collect()
}

/// Names of `pub const X: u16` items.
fn action_ids(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|l| l.trim().strip_prefix("pub const "))
        .filter_map(|rest| rest.split_once(": u16"))
        .map(|(name, _)| name.to_string())
        .collect()
}

fn mentions(source: &str, name: &str) -> bool {
    source.match_indices(name).any(|(at, _)| {
        let before = source[..at].chars().next_back();
        let after = source[at + name.len()..].chars().next();
        let ident = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        !ident(before) && !ident(after)
    })
}

#[test]
fn key_hints_are_always_clickable() {
    let source = read_src("src/adventure/render.rs");
    let bad = unclickable_key_hints(&source);
    assert!(
        bad.is_empty(),
        "key hints rendered with plain push(); use push_choice or push_clickable:\n{}",
        bad.iter()
            .map(|(n, call)| format!("  render.rs:{n}: {call}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn every_action_id_is_drawn() {
    let actions = read_src("src/adventure/actions.rs");
    let render = read_src("src/adventure/render.rs");
    let ids = action_ids(&actions);
    assert!(ids.contains(&"GATHER".to_string()), "no action ids parsed");

    // ENTRY_RANGE is the width of each `*_BASE` block, not an action.
    let missing: Vec<_> = ids
        .iter()
        .filter(|id| id.as_str() != "ENTRY_RANGE")
        .filter(|id| !mentions(&render, id))
        .collect();
    assert!(missing.is_empty(), "action ids with no click target: {missing:?}");
}

#[test]
fn flags_single_line_push() {
    let src = r#"cl.push(Line::from(" [3] Inventory"));"#;
    assert_eq!(unclickable_key_hints(src).len(), 1);
}

#[test]
fn flags_push_split_over_lines() {
    let src = "cl.push(Line::from(Span::styled(\n    \" [0] Close\",\n    Style::default(),\n)));\ncl.push(Line::from(\"\"));";
    let bad = unclickable_key_hints(src);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].0, 1);
}

#[test]
fn flags_key_template() {
    let src = r#"cl.push(Line::from(format!(" [{}] {}", key, label)));"#;
    assert_eq!(unclickable_key_hints(src).len(), 1);
}

#[test]
fn allows_clickable_and_choice_helpers() {
    let src = "cl.push_clickable(\n    Line::from(\" [0] Close\"),\n    CLOSE_OVERLAY,\n);\npush_choice(cl, '1', \"Gather\", \"\", GATHER);\npush_choice_dim(cl, 'a', \"Bread\", \"[x]\", CRAFT_BASE);";
    assert!(unclickable_key_hints(src).is_empty());
}

#[test]
fn ignores_comments_and_plain_text() {
    let src = "// cl.push(Line::from(\" [0] Close\"));\ncl.push(note(\"Slots [full]\".to_string()));\nhp.push(Span::raw(\"x\"));";
    assert!(unclickable_key_hints(src).is_empty());
}

#[test]
fn key_hint_shapes() {
    assert!(has_key_hint(" [a] Bread"));
    assert!(has_key_hint(" [7] Skills"));
    assert!(has_key_hint("format!(\" [{}] \", key)"));
    assert!(!has_key_hint("[]"));
    assert!(!has_key_hint("[ab]"));
    assert!(!has_key_hint("no keys here"));
}

#[test]
fn action_ids_parse_constants() {
    let src = "pub const GATHER: u16 = 1;\npub const ATTACK_BASE: u16 = 800; // +index\nconst HIDDEN: u16 = 3;";
    assert_eq!(action_ids(src), vec!["GATHER", "ATTACK_BASE"]);
}

#[test]
fn mentions_matches_whole_identifiers() {
    assert!(mentions("push_choice(cl, '4', \"Flee\", \"\", FLEE);", "FLEE"));
    assert!(!mentions("let x = FLEE_FAST;", "FLEE"));
}
