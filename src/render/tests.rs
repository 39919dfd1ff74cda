use super::*;
use crate::model::STORY_TITLE_STYLE;
use crate::overlay::{MemoryTarget, Overlay};

fn settings() -> RenderSettings {
    RenderSettings {
        px_per_cm: 100.0,
        font_size_cm_a4: 0.5,
        per_line_dy_cm_a4: 0.6,
        box_poly_stroke_width_cm: 0.05,
        box_poly_dx_cm_a4: 0.2,
        ..RenderSettings::default()
    }
}

fn renderer() -> PanelRenderer {
    PanelRenderer::new(settings(), TieBreak::VerticalWins)
}

fn ctx() -> RenderContext {
    RenderContext::new(vec!["en".to_string(), "de".to_string()], 0)
}

fn panel_with(slot: TextSlot) -> Panel {
    Panel::new(1, TextBox::new(100, 200, 400, 300)).with_slot(slot)
}

fn boxed_slot() -> TextSlot {
    TextSlot::new(0)
        .with_rect(TextBox::new(150, 250, 100, 50))
        .with_pointer(Point::ORIGIN)
        .with_text("en", "Hi")
}

#[test]
fn test_boxed_slot_markup() {
    let html = renderer()
        .render_panel(&panel_with(boxed_slot()), &ctx())
        .unwrap();

    let expected = concat!(
        r#"<div class="panelrect col0" data-slot="0" style="left:50px; top:50px; width:100px; height:50px;"></div>"#,
        r#"<svg class="paneltexts" viewBox="0 0 400 300" width="400" height="300">"#,
        r#"<polygon points="55,55 145,55 145,95 55,95" class="pt" stroke-width="5px"/>"#,
        r#"<svg x="50" y="50" class="ptbf">"#,
        r#"<text y="0px" style="font-size: 49px;">"#,
        r#"<tspan style="" class="std">"#,
        r#"<tspan dy="60" x="20" class="std">Hi</tspan>"#,
        r#"</tspan></text></svg></svg>"#,
    );
    assert_eq!(html, expected);
}

#[test]
fn test_balloon_gets_tail_and_class() {
    let slot = boxed_slot().with_pointer(Point::new(200, 400));
    let html = renderer().render_panel(&panel_with(slot), &ctx()).unwrap();

    assert!(html.contains(
        r#"<polygon points="55,55 145,55 145,95 105,95 100,200 55,95" class="pt ptb""#
    ));
}

#[test]
fn test_no_pointer_means_no_outline() {
    let mut slot = boxed_slot();
    slot.pointer = None;
    let html = renderer().render_panel(&panel_with(slot), &ctx()).unwrap();

    assert!(!html.contains("<polygon"));
    assert!(!html.contains("ptbf"));
    assert!(html.contains(r#"<svg x="50" y="50"><text style="font-size: 49px;">"#));
    assert!(html.contains(r#"<tspan dy="60" x="0" class="std">Hi</tspan>"#));
}

#[test]
fn test_empty_panel_renders_nothing() {
    let panel = Panel::new(0, TextBox::new(0, 0, 100, 100));
    assert_eq!(renderer().render_panel(&panel, &ctx()).unwrap(), "");

    let unplaced = panel_with(TextSlot::new(0).with_text("en", "lost"));
    assert_eq!(renderer().render_panel(&unplaced, &ctx()).unwrap(), "");
}

#[test]
fn test_zero_sized_box_is_left_out() {
    let panel = panel_with(boxed_slot()).with_slot(
        TextSlot::new(1)
            .with_rect(TextBox::new(300, 300, 0, 40))
            .with_pointer(Point::new(10, 10))
            .with_text("en", "ghost"),
    );
    let html = renderer().render_panel(&panel, &ctx()).unwrap();

    assert_eq!(html.matches("<polygon").count(), 1);
    assert_eq!(html.matches("panelrect").count(), 1);
    assert!(!html.contains("ghost"));
    assert!(!html.contains(r#"data-slot="1""#));
}

#[test]
fn test_rerender_is_byte_identical_and_written_once() {
    let panel = panel_with(boxed_slot().with_pointer(Point::new(400, 260)));
    let renderer = renderer();
    let mut overlay = Overlay::new();
    let mut target = MemoryTarget::default();

    for _ in 0..3 {
        let html = renderer.render_panel(&panel, &ctx()).unwrap();
        overlay.refresh(&mut target, html).unwrap();
    }
    assert_eq!(target.writes, 1);

    let moved = panel_with(boxed_slot().with_pointer(Point::new(400, 300)));
    let html = renderer.render_panel(&moved, &ctx()).unwrap();
    assert!(overlay.refresh(&mut target, html).unwrap());
    assert_eq!(target.writes, 2);
}

#[test]
fn test_slot_colour_classes_cycle() {
    let mut panel = Panel::new(0, TextBox::new(0, 0, 500, 500));
    for i in 0..10 {
        panel = panel.with_slot(TextSlot::new(i).with_rect(TextBox::new(i as i32 * 40, 0, 30, 30)));
    }
    let html = renderer().render_panel(&panel, &ctx()).unwrap();
    assert!(html.contains(r#"class="panelrect col7" data-slot="7""#));
    assert!(html.contains(r#"class="panelrect col0" data-slot="8""#));
    assert!(html.contains(r#"class="panelrect col1" data-slot="9""#));
}

#[test]
fn test_language_selection() {
    let slot = boxed_slot().with_text("de", "Hallo");
    let panel = panel_with(slot.clone());
    let r = renderer();

    let html = r.render_panel(&panel, &ctx()).unwrap();
    assert!(html.contains(">Hi<"));

    let german = RenderContext::new(ctx().langs, 1);
    assert!(r.render_panel(&panel, &german).unwrap().contains(">Hallo<"));

    // Primary language empty: fall back to the first language
    let mut only_en = slot;
    only_en.texts.remove("de");
    let html = r.render_panel(&panel_with(only_en), &german).unwrap();
    assert!(html.contains(">Hi<"));

    // The focused field wins while it holds text
    let focused = ctx().with_focus(Some(FieldFocus {
        panel: 1,
        slot: 0,
        lang: "de".to_string(),
    }));
    assert!(r.render_panel(&panel, &focused).unwrap().contains(">Hallo<"));

    let other_panel = ctx().with_focus(Some(FieldFocus {
        panel: 2,
        slot: 0,
        lang: "de".to_string(),
    }));
    assert!(r.render_panel(&panel, &other_panel).unwrap().contains(">Hi<"));
}

#[test]
fn test_outline_without_text() {
    let mut slot = boxed_slot();
    slot.texts.clear();
    let html = renderer().render_panel(&panel_with(slot), &ctx()).unwrap();
    assert!(html.contains("<polygon"));
    assert!(!html.contains("<text"));
}

#[test]
fn test_inline_markup_and_escaping() {
    let slot = boxed_slot().with_text("en", "a <b>big</b> & <deal>\n\nend");
    let html = renderer().render_panel(&panel_with(slot), &ctx()).unwrap();

    assert!(html.contains(r#"<tspan class="b" font-weight="bold">big</tspan>"#));
    assert!(html.contains("a\u{a0}<tspan"));
    assert!(html.contains("\u{a0}&amp;\u{a0}&lt;deal&gt;</tspan>"));
    assert_eq!(html.matches(r#"<tspan dy="60""#).count(), 3);
    assert!(html.contains(">\u{a0}</tspan>"));
}

#[test]
fn test_story_title_and_classes() {
    let mut title = boxed_slot();
    title.tspan_style = STORY_TITLE_STYLE.to_string();
    let html = renderer().render_panel(&panel_with(title), &ctx()).unwrap();
    assert!(html.contains(r#"<tspan style="" class="">"#));
    assert!(html.contains(r#"<tspan dy="73""#));

    let mut settings = settings();
    settings
        .css
        .insert(".shout".to_string(), [("fill".to_string(), "red".to_string())].into());
    let r = PanelRenderer::new(settings, TieBreak::VerticalWins);
    let mut shout = boxed_slot();
    shout.tspan_style = ".shout".to_string();
    let html = r.render_panel(&panel_with(shout), &ctx()).unwrap();
    assert!(html.contains(r#"<tspan dy="60" x="20" style="fill:red;" class="std shout">"#));
}

#[test]
fn test_font_family_style_drops_std_class() {
    let mut slot = boxed_slot();
    slot.tspan_style = "font-family: serif;\nfont-size: 80%".to_string();
    slot.transform = "rotate(-5)".to_string();
    let html = renderer().render_panel(&panel_with(slot), &ctx()).unwrap();
    assert!(html.contains(r#"<text y="0px" style="font-size: 49px;" transform="rotate(-5)">"#));
    assert!(html.contains(r#"<tspan style="font-family: serif; font-size: 80%" class="">"#));
}

#[test]
fn test_huge_coordinates_skip_the_slot() {
    use std::collections::HashMap;

    use crate::fields::read_panel;

    let fields: HashMap<String, String> = [
        ("p1t0rxy", "2147483000,0"),
        ("p1t0rwh", "1000,10"),
        ("p1t0en", "overflow"),
        ("p1t1rxy", "150,250"),
        ("p1t1rwh", "100,50"),
        ("p1t1rpxy", "-2147483648,300"),
        ("p1t1en", "kept"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let panel = read_panel(&fields, 1, TextBox::new(100, 200, 400, 300), 2, &ctx().langs);
    let html = renderer().render_panel(&panel, &ctx()).unwrap();

    assert!(!html.contains("overflow"));
    assert!(html.contains(">kept<"));
    assert!(!html.contains("<polygon"));

    // Boxes and pointers built directly, bypassing field parsing
    let wild = panel_with(
        TextSlot::new(0)
            .with_rect(TextBox::new(2_147_483_000, 0, 1000, 10))
            .with_pointer(Point::new(5, 5))
            .with_text("en", "wild"),
    )
    .with_slot(boxed_slot().with_pointer(Point::new(i32::MAX, i32::MIN)));
    let html = renderer().render_panel(&wild, &ctx()).unwrap();
    assert!(!html.contains("wild"));
    assert!(!html.contains("<polygon"));
    assert!(html.contains(">Hi<"));

    let far_panel = Panel::new(0, TextBox::new(i32::MIN, 0, 10, 10)).with_slot(boxed_slot());
    assert_eq!(renderer().render_panel(&far_panel, &ctx()).unwrap(), "");
}
