mod common;

use crate::common::utils::*;
use element_grounding::collector::collector::{MatchSource, collect};
use element_grounding::collector::selector::{SelectorList, Tier};
use element_grounding::config::SelectorConfig;
use element_grounding::dom::page::NodeId;

fn sources(collection: &element_grounding::collector::collector::Collection) -> Vec<(usize, MatchSource)> {
    collection
        .candidates
        .iter()
        .map(|c| (c.node.0, c.source))
        .collect()
}

// =========================================================================
// Selector tiers
// =========================================================================

#[test]
fn tiers_are_applied_high_to_low() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let card = add(&mut page, root, el("div", 0.0, 0.0, 200.0, 100.0).attr("class", "clickable"));
    let link = add(&mut page, root, el("a", 0.0, 120.0, 80.0, 20.0).attr("href", "/docs"));
    let tab = add(&mut page, root, el("span", 0.0, 160.0, 80.0, 20.0).attr("tabindex", "0"));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(
        sources(&collection),
        vec![
            (link.0, MatchSource::Selector(Tier::High)),
            (tab.0, MatchSource::Selector(Tier::Medium)),
            (card.0, MatchSource::Selector(Tier::Low)),
        ]
    );
}

#[test]
fn element_matching_several_tiers_is_collected_once() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let button = add(
        &mut page,
        root,
        el("button", 10.0, 10.0, 80.0, 30.0)
            .attr("class", "btn btn-primary")
            .attr("onclick", "save()")
            .cursor("pointer"),
    );

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(sources(&collection), vec![(button.0, MatchSource::Selector(Tier::High))]);
}

#[test]
fn hidden_inputs_and_negative_tabindex_are_not_candidates() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    add(&mut page, root, el("input", 0.0, 0.0, 100.0, 20.0).attr("type", "hidden"));
    add(&mut page, root, el("div", 0.0, 40.0, 100.0, 20.0).attr("tabindex", "-1"));
    let email = add(&mut page, root, el("input", 0.0, 80.0, 100.0, 20.0).attr("type", "email"));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(sources(&collection), vec![(email.0, MatchSource::Selector(Tier::High))]);
}

#[test]
fn pointer_cursor_fallback_catches_unlabelled_controls() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let plain = add(&mut page, root, el("div", 0.0, 0.0, 100.0, 20.0));
    let styled = add(&mut page, root, el("div", 0.0, 40.0, 100.0, 20.0).cursor("pointer"));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(sources(&collection), vec![(styled.0, MatchSource::CursorPointer)]);
    assert!(!collection.contexts.contains_key(&plain));
}

#[test]
fn malformed_tier_is_skipped_and_others_still_run() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let button = add(&mut page, root, el("button", 0.0, 0.0, 80.0, 30.0));
    add(&mut page, root, el("div", 0.0, 40.0, 80.0, 30.0).attr("onclick", "go()"));

    let selectors = SelectorConfig {
        medium: vec!["div > [onclick]".to_string()],
        ..SelectorConfig::default()
    };
    let collection = collect(&page, &selectors);

    assert_eq!(collection.skipped_tiers, 1);
    assert_eq!(sources(&collection)[0], (button.0, MatchSource::Selector(Tier::High)));
    // Only the medium tier knew about onclick
    assert_eq!(collection.candidates.len(), 1);
}

#[test]
fn selector_list_matches_role_and_contenteditable() {
    let list = SelectorList::parse("[role='button'], [contenteditable='true']").unwrap();
    assert!(list.matches(&el("div", 0.0, 0.0, 1.0, 1.0).attr("role", "button")));
    assert!(list.matches(&el("div", 0.0, 0.0, 1.0, 1.0).attr("contenteditable", "true")));
    assert!(!list.matches(&el("div", 0.0, 0.0, 1.0, 1.0).attr("contenteditable", "false")));
}

// =========================================================================
// Shadow roots and iframes
// =========================================================================

#[test]
fn shadow_content_records_outermost_host() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let outer = add(&mut page, root, el("app-shell", 0.0, 0.0, 400.0, 300.0));
    let outer_shadow = page.attach_shadow(outer).unwrap();
    let inner = add(&mut page, outer_shadow, el("user-menu", 0.0, 0.0, 200.0, 40.0));
    let inner_shadow = page.attach_shadow(inner).unwrap();
    let button = add(&mut page, inner_shadow, el("button", 10.0, 10.0, 60.0, 20.0));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(sources(&collection), vec![(button.0, MatchSource::Selector(Tier::High))]);
    let ctx = collection.context_of(button);
    assert_eq!(ctx.shadow_host, Some(outer));
    assert_eq!(ctx.iframe, None);
}

#[test]
fn same_origin_iframe_content_is_collected_with_frame_context() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let frame = add(&mut page, root, el("iframe", 200.0, 100.0, 400.0, 300.0));
    let doc = page.attach_frame_document(frame, true).unwrap();
    let button = add(&mut page, doc, el("button", 10.0, 20.0, 100.0, 30.0));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(collection.candidates.len(), 1);
    assert_eq!(collection.candidates[0].node, button);
    assert_eq!(collection.context_of(button).iframe, Some(frame));
    assert_eq!(collection.skipped_frames, 0);
}

#[test]
fn cross_origin_iframe_is_skipped_silently() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let frame = add(&mut page, root, el("iframe", 0.0, 0.0, 400.0, 300.0));
    let doc = page.attach_frame_document(frame, false).unwrap();
    add(&mut page, doc, el("button", 10.0, 20.0, 100.0, 30.0));
    let outside = add(&mut page, root, el("a", 0.0, 400.0, 80.0, 20.0));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(collection.skipped_frames, 1);
    assert_eq!(sources(&collection), vec![(outside.0, MatchSource::Selector(Tier::High))]);
}

#[test]
fn iframe_without_document_counts_as_skipped() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    add(&mut page, root, el("iframe", 0.0, 0.0, 400.0, 300.0));

    let collection = collect(&page, &SelectorConfig::default());

    assert_eq!(collection.skipped_frames, 1);
    assert!(collection.candidates.is_empty());
}

#[test]
fn nested_iframes_are_not_scanned() {
    let mut page = page(1000.0, 800.0);
    let root = page.root();
    let frame = add(&mut page, root, el("iframe", 0.0, 0.0, 600.0, 400.0));
    let doc = page.attach_frame_document(frame, true).unwrap();
    let first = add(&mut page, doc, el("button", 10.0, 10.0, 80.0, 30.0));
    let nested = add(&mut page, doc, el("iframe", 100.0, 100.0, 300.0, 200.0));
    let nested_doc = page.attach_frame_document(nested, true).unwrap();
    add(&mut page, nested_doc, el("button", 10.0, 10.0, 80.0, 30.0));

    let collection = collect(&page, &SelectorConfig::default());

    let nodes: Vec<NodeId> = collection.candidates.iter().map(|c| c.node).collect();
    assert_eq!(nodes, vec![first]);
    assert_eq!(collection.skipped_frames, 0);
}

#[test]
fn empty_page_yields_no_candidates() {
    let page = page(1000.0, 800.0);
    let collection = collect(&page, &SelectorConfig::default());
    assert!(collection.candidates.is_empty());
    assert!(collection.contexts.is_empty());
}
