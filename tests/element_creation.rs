mod common;

use annotation_canvas::element::{self, Element, ElementKind, ImageData, MIN_ELEMENT_SIZE};
use common::png;
use egui::{Color32, Pos2, Rect, Vec2};

#[test]
fn test_rectangle_factory() {
    let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(110.0, 70.0));
    let element = element::factory::create_rectangle(rect, 4.0, 8.0, Color32::RED);

    assert_eq!(element.kind.name(), "rectangle");
    assert_eq!(element.position, Pos2::new(10.0, 20.0));
    assert_eq!(element.bounds(), rect);
    assert!(element.selectable);
    assert!(element.evented);
    assert!(!element.temporary);
}

#[test]
fn test_circle_factory() {
    let element = element::factory::create_circle(Pos2::new(100.0, 100.0), 25.0, 4.0, Color32::RED);

    assert_eq!(element.position, Pos2::new(75.0, 75.0));
    assert_eq!(element.size(), Vec2::splat(50.0));
    assert_eq!(element.center(), Pos2::new(100.0, 100.0));
}

#[test]
fn test_image_factory() {
    let data = ImageData::from_encoded(png(4, 3, [255, 0, 0, 255])).unwrap();
    assert_eq!((data.width, data.height), (4, 3));

    let image = element::factory::create_image(data, Pos2::new(20.0, 20.0), 0.5);
    assert!(image.is_image());
    assert_eq!(image.size(), Vec2::new(2.0, 1.5));
}

#[test]
fn test_arrow_factory() {
    let tail = Pos2::new(10.0, 50.0);
    let tip = Pos2::new(110.0, 50.0);
    let arrow = element::factory::create_arrow(tail, tip, Color32::RED);

    let ElementKind::Arrow(data) = &arrow.kind else {
        panic!("expected an arrow, got {:?}", arrow.kind);
    };
    // Stored relative to the outline's top-left
    assert_eq!(arrow.position + data.tail, tail);
    assert_eq!(arrow.position + data.tip, tip);
    assert!(arrow.bounds().contains(tail));
    assert!(arrow.size().y >= element::arrow::HEAD_WIDTH - 0.01);
}

#[test]
fn test_annotation_factory() {
    let annotation =
        element::factory::create_annotation(7, Pos2::new(50.0, 50.0), 18.0, Color32::RED);

    let data = annotation.as_annotation().unwrap();
    assert_eq!(data.label(), "7");
    assert_eq!(annotation.size(), Vec2::splat(36.0));
    assert!(annotation.as_text().is_none());
}

#[test]
fn test_text_factory() {
    let mut text = element::factory::create_text("Hi", Pos2::ZERO, 24.0, Color32::BLACK);
    assert_eq!(text.as_text().unwrap().content, "Hi");
    let short = text.size();

    text.as_text_mut().unwrap().content = "Hello there".to_owned();
    assert!(text.size().x > short.x);
}

#[test]
fn test_preview_is_not_interactive() {
    let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(40.0));
    let preview =
        element::factory::create_rectangle(rect, 4.0, 8.0, Color32::RED).into_preview(0.5);

    assert!(preview.temporary);
    assert!(!preview.selectable);
    assert!(!preview.evented);
    assert_eq!(preview.opacity, 0.5);
}

#[test]
fn test_scale_is_clamped_to_minimum_size() {
    let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
    let mut element = element::factory::create_rectangle(rect, 4.0, 8.0, Color32::RED);

    element.scale_by(Vec2::splat(0.0001));
    assert!(element.size().x >= MIN_ELEMENT_SIZE - 0.001);
    assert!(element.size().y >= MIN_ELEMENT_SIZE - 0.001);

    element.rotate_by(-90.0);
    assert_eq!(element.rotation, 270.0);
}

#[test]
fn test_duplicate_gets_fresh_id() {
    let rect = Rect::from_min_size(Pos2::new(5.0, 5.0), Vec2::splat(40.0));
    let original = element::factory::create_rectangle(rect, 4.0, 8.0, Color32::RED);
    let copy = original.duplicate(Vec2::splat(20.0));

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.position, Pos2::new(25.0, 25.0));
    assert_eq!(copy.kind, original.kind);
}

#[test]
fn test_element_json_round_trip_keeps_kind_tag() {
    let element = element::factory::create_circle(Pos2::new(30.0, 30.0), 10.0, 2.0, Color32::BLUE);
    let json = serde_json::to_string(&element).unwrap();
    assert!(json.contains("\"type\":\"circle\""));

    let parsed: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, element);
}
