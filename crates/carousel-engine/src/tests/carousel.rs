use super::{TestAssets, compositor_with, decode, gradient, png_bytes, slides};
use crate::fonts::BUNDLED_FONT_FAMILY;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, CarouselRequest, LogoOptions, LogoPosition, LogoSize};

/// Row well clear of text, counter, logo and progress bar.
const QUIET_ROW: u32 = 300;

#[test]
fn test_one_png_per_slide_in_order() {
    let assets = TestAssets::new("one_per_slide").with_template("b1.jpg");
    let request = CarouselRequest::template(slides(&["first", "*second*", "third"]), "b1");

    let output = assets.compositor().render(&request).unwrap();
    assert_eq!(output.len(), 3);
    assert!(output.is_complete());

    for (i, slide) in output.slides().iter().enumerate() {
        let slide = slide.as_ref().unwrap();
        assert_eq!(slide.index, i);
        assert_eq!(slide.total, 3);
        let img = decode(&slide.png);
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }
    assert_eq!(output.into_pngs().unwrap().len(), 3);
}

#[test]
fn test_hebrew_template_slides_shift_background() {
    let assets = TestAssets::new("hebrew_parallax").with_template("b1.jpg");
    let request = CarouselRequest::template(slides(&["*שלום* עולם", "שקופית שנייה"]), "b1");

    let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    assert_eq!(pngs.len(), 2);
    let first = decode(&pngs[0]);
    let second = decode(&pngs[1]);

    for x in (500..800).step_by(7) {
        assert_eq!(
            second.get_pixel(x, QUIET_ROW),
            first.get_pixel(x + 216, QUIET_ROW),
            "x = {x}"
        );
    }
    assert_ne!(first, second);
}

#[test]
fn test_custom_background_is_identical_on_every_slide() {
    let assets = TestAssets::new("custom_static");
    let request = CarouselRequest::custom(
        slides(&["one", "two", "three"]),
        png_bytes(&gradient(800, 1000)),
    );

    let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    let images: Vec<_> = pngs.iter().map(|p| decode(p)).collect();
    for x in (400..1000).step_by(5) {
        let expected = images[0].get_pixel(x, QUIET_ROW);
        for img in &images[1..] {
            assert_eq!(img.get_pixel(x, QUIET_ROW), expected, "x = {x}");
        }
    }
}

#[test]
fn test_same_seed_gives_identical_bytes() {
    let assets = TestAssets::new("seeded").with_template("T_06.jpg");
    let request = CarouselRequest::template(slides(&["alpha *beta*", "gamma"]), "T_06");

    let a = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    let b = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    assert_eq!(a, b);

    let other = compositor_with(assets.config().with_grain_seed(8))
        .render(&request)
        .unwrap()
        .into_pngs()
        .unwrap();
    assert_ne!(a, other);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let assets = TestAssets::new("parallel").with_template("b2.jpg");
    let request = CarouselRequest::template(slides(&["a", "b", "c", "d"]), "b2");

    let parallel = compositor_with(assets.config().with_parallel(true))
        .render(&request)
        .unwrap()
        .into_pngs()
        .unwrap();
    let sequential = compositor_with(assets.config().with_parallel(false))
        .render(&request)
        .unwrap()
        .into_pngs()
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_logo_is_drawn_top_right() {
    let assets = TestAssets::new("logo_drawn").with_template("b1.jpg");
    let logo = image::RgbaImage::from_pixel(100, 100, image::Rgba([255, 0, 0, 255]));
    let request = CarouselRequest::template(slides(&["with logo"]), "b1").with_logo(LogoOptions {
        bytes: png_bytes(&logo),
        position: LogoPosition::TopRight,
        size: LogoSize::Medium,
        transparent: false,
    });

    let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    let img = decode(&pngs[0]);
    // Card at (868, 80), logo inset by 16.
    assert_eq!(img.get_pixel(884 + 50, 96 + 50), &image::Rgba([255, 0, 0, 255]));
}

#[test]
fn test_undecodable_logo_is_skipped() {
    let assets = TestAssets::new("bad_logo").with_template("b1.jpg");
    let request = CarouselRequest::template(slides(&["x", "y"]), "b1").with_logo(LogoOptions {
        bytes: b"not an image".to_vec(),
        position: LogoPosition::BottomLeft,
        size: LogoSize::Large,
        transparent: true,
    });

    let output = assets.compositor().render(&request).unwrap();
    assert!(output.is_complete());
    assert_eq!(output.len(), 2);
}

#[test]
fn test_missing_font_falls_back_to_bundled() {
    let assets = TestAssets::new("font_fallback").with_template("b1.jpg");
    let request =
        CarouselRequest::template(slides(&["fallback"]), "b1").with_font_family("Not-Installed");

    let compositor = assets.compositor();
    let output = compositor.render(&request).unwrap();
    assert!(output.is_complete());
    assert!(compositor.fonts().contains(BUNDLED_FONT_FAMILY));
    assert!(!compositor.fonts().contains("Not-Installed"));
}

#[test]
fn test_font_from_asset_dir_is_registered() {
    let bytes = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/fonts/DejaVuSans-Bold.ttf"
    ))
    .unwrap();
    let assets = TestAssets::new("font_assets")
        .with_template("b1.jpg")
        .with_font("Brand-Font", &bytes);
    let request =
        CarouselRequest::template(slides(&["branded"]), "b1").with_font_family("Brand-Font");

    let compositor = assets.compositor();
    assert!(compositor.render(&request).unwrap().is_complete());
    assert!(compositor.fonts().contains("Brand-Font"));
}

#[test]
fn test_auto_registered_template_renders() {
    let assets = TestAssets::new("auto_template").with_template("T_130.png");
    let request = CarouselRequest::template(slides(&["nature"]), "T_130");
    assert!(assets.compositor().render(&request).unwrap().is_complete());
}

#[test]
fn test_overflowing_text_still_renders() {
    let assets = TestAssets::new("overflow").with_template("b1.jpg");
    let long = "word ".repeat(400);
    let request = CarouselRequest::template(vec![long, "x".repeat(300)], "b1");
    assert!(assets.compositor().render(&request).unwrap().is_complete());
}

#[test]
fn test_request_from_json() {
    let assets = TestAssets::new("json_request").with_template("b3.jpg");
    let json = r##"{
        "slides": ["*כותרת* ראשית", "2024 שנה"],
        "background": { "mode": "template", "id": "b3" },
        "accent_color": "#22C55E",
        "text_color": "#FFFFFF",
        "headline_font_size": 100,
        "body_font_size": 80
    }"##;
    let request: CarouselRequest = serde_json::from_str(json).unwrap();
    let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    assert_eq!(pngs.len(), 2);
}

#[test]
fn test_slide_count_bounds() {
    let assets = TestAssets::new("slide_counts").with_template("b5.jpg");
    for count in [1, 20] {
        let texts: Vec<String> = (0..count).map(|i| format!("slide {i}")).collect();
        let request = CarouselRequest::template(texts, "b5");
        let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
        assert_eq!(pngs.len(), count);
        let last = decode(&pngs[count - 1]);
        assert_eq!(last.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }
}

#[test]
fn test_mixed_script_slide_renders() {
    let assets = TestAssets::new("mixed_script").with_template("b2.jpg");
    let request = CarouselRequest::template(
        slides(&["בחרו *Google Cloud* עכשיו", "hello שלום 2024"]),
        "b2",
    )
    .with_font_sizes(Some(150.0), None);
    let pngs = assets.compositor().render(&request).unwrap().into_pngs().unwrap();
    assert_eq!(pngs.len(), 2);
}
