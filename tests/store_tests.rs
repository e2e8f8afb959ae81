//! # Persistence Round-Trips
//!
//! Templates and history through a real [`FileStore`] in a temp directory,
//! with the editor capturing and restoring its state.

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use quotecard::editor::{EditorState, PreviewBackground};
use quotecard::render::{BackgroundImage, encode_png};
use quotecard::store::history::{HISTORY_KEY, QuoteHistory};
use quotecard::store::templates::{SaveOutcome, TEMPLATES_KEY, TemplateStore};
use quotecard::store::{FileStore, KeyValueStore};
use quotecard::style::{Color, ContentStrings};

fn styled_editor() -> EditorState {
    let mut editor = EditorState::default();
    editor.style.enable_quote2 = true;
    editor.style.card_width = 1080;
    editor.style.card_height = 1350;
    editor.style.quote1_color = Color::rgb(0x22, 0x33, 0x44);
    editor.style.enable_colored_borders = false;
    editor.content = ContentStrings::new("Demnitatea nu se cerșește")
        .with_quote2("se trăiește")
        .with_author("Maria");
    editor.offsets.quote1_offset = -18.0;
    editor.offsets.divider1_offset = 6.5;
    editor.preview_background = PreviewBackground::Dark;

    let png = encode_png(&RgbaImage::from_pixel(16, 9, Rgba([10, 120, 200, 255]))).unwrap();
    editor.load_image_bytes(&png).unwrap();
    editor.set_image_zoom(1.8);
    editor.set_image_rotation(15.0);
    editor.image_transform.pan_x = -40.0;
    editor
}

#[test]
fn test_template_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let editor = styled_editor();

    {
        let store = FileStore::new(dir.path());
        let outcome = TemplateStore::new(&store)
            .save("Poster", editor.capture_settings(), |_| panic!("no overwrite expected"))
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Created("Poster".into()));
    }

    // A fresh store over the same directory sees the template
    let store = FileStore::new(dir.path());
    let templates = TemplateStore::new(&store);
    let summaries = templates.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Poster");

    let template = templates.find("Poster").unwrap().unwrap();
    let mut restored = EditorState::default();
    restored.apply_settings(&template.settings).unwrap();

    assert_eq!(restored.style, editor.style);
    assert_eq!(restored.content, editor.content);
    assert_eq!(restored.offsets, editor.offsets);
    assert_eq!(restored.image_transform, editor.image_transform);
    assert_eq!(restored.preview_background, PreviewBackground::Dark);
    assert_eq!(restored.render(), editor.render());
}

#[test]
fn test_unnamed_templates_and_overwrite_decline() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let templates = TemplateStore::new(&store);
    let editor = styled_editor();

    assert_eq!(
        templates.save("  ", editor.capture_settings(), |_| false).unwrap(),
        SaveOutcome::Created("Template 1".into())
    );
    assert_eq!(
        templates.save("", editor.capture_settings(), |_| false).unwrap(),
        SaveOutcome::Created("Template 2".into())
    );

    let before = store.get(TEMPLATES_KEY).unwrap();
    let outcome = templates
        .save("Template 1", EditorState::default().capture_settings(), |_| false)
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Declined("Template 1".into()));
    assert_eq!(store.get(TEMPLATES_KEY).unwrap(), before);

    assert_eq!(templates.delete(0, |_| false).unwrap(), None);
    assert_eq!(templates.delete(0, |_| true).unwrap().as_deref(), Some("Template 1"));
    assert_eq!(templates.len(), 1);
}

#[test]
fn test_legacy_template_without_image_or_content() {
    let store = quotecard::store::MemoryStore::new();
    store
        .set(
            TEMPLATES_KEY,
            r##"[{"name":"Vechi","createdAt":"2024-01-01T00:00:00.000Z","settings":{
                "cardWidth":"1000","cardHeight":1200,"bgColor":"#101010",
                "enableQuote2Toggle":true,"previewBg":null,"backgroundImageData":null}}]"##,
        )
        .unwrap();

    let mut editor = styled_editor();
    let template = TemplateStore::new(&store).find("Vechi").unwrap().unwrap();
    editor.apply_settings(&template.settings).unwrap();

    assert_eq!(editor.style.card_width, 1000);
    assert_eq!(editor.style.bg_color, Color::rgb(0x10, 0x10, 0x10));
    assert!(editor.style.enable_quote2);
    assert!(!editor.has_image());
    assert_eq!(editor.preview_background, PreviewBackground::Light);
    // No content stored: the current texts stay
    assert_eq!(editor.content.quote1, "Demnitatea nu se cerșește");
}

#[test]
fn test_history_persists_across_stores() {
    let dir = tempfile::tempdir().unwrap();

    let mut history = QuoteHistory::load(&FileStore::new(dir.path()));
    assert!(history.is_empty());
    history.push_at("Primul", 1_700_000_000_000);
    history.push_at("Al doilea", 1_700_000_001_000);
    history.save(&FileStore::new(dir.path()));

    let reloaded = QuoteHistory::load(&FileStore::new(dir.path()));
    assert_eq!(reloaded.texts(), vec!["Al doilea", "Primul"]);

    // Corrupt file on disk degrades to an empty history
    FileStore::new(dir.path()).set(HISTORY_KEY, "[{").unwrap();
    assert!(QuoteHistory::load(&FileStore::new(dir.path())).is_empty());
}

#[test]
fn test_background_data_url_survives_template() {
    let store = quotecard::store::MemoryStore::new();
    let editor = styled_editor();
    let data_url = editor.background().unwrap().data_url().to_string();
    assert!(data_url.starts_with("data:image/png;base64,"));

    TemplateStore::new(&store)
        .save("Img", editor.capture_settings(), |_| true)
        .unwrap();
    let template = TemplateStore::new(&store).find("Img").unwrap().unwrap();
    assert_eq!(template.settings.background_image_data.as_deref(), Some(data_url.as_str()));

    let image = BackgroundImage::from_data_url(&data_url).unwrap();
    assert_eq!((image.width(), image.height()), (16, 9));
}
