use super::*;
use crate::generate::mock::MockBackend;
use base64::prelude::*;
use guide::PieceCount;

fn weights(num: u32, total: u32) -> PromptWeights {
    PromptWeights::from_count(PieceCount::new(num, total).unwrap())
}

fn models() -> Vec<String> {
    vec![
        "control_v11p_sd15_canny".into(),
        "control_v11p_sd15_seg [e1f51eb9]".into(),
        "control_v11f1p_sd15_depth [cfd03158]".into(),
    ]
}

fn decode_unit_image(unit: &ControlNetUnit) -> image::RgbaImage {
    let png = BASE64_STANDARD.decode(&unit.image).unwrap();
    image::load_from_memory(&png).unwrap().to_rgba8()
}

// =============================================================================
// Prompt
// =============================================================================

#[test]
fn prompt_for_one_of_twelve_is_half_eaten() {
    assert_eq!(
        pizza_prompt(weights(1, 12)),
        "pieces of mouthwatering pizza on the plate,(half eaten:0.5),(empty plate:1.01),\
         an incredibly realistic and visually enticing image,\
         photograph with vibrant colors and textures,"
    );
}

#[test]
fn prompt_at_exactly_half_is_not_half_eaten() {
    let prompt = pizza_prompt(weights(6, 12));
    assert!(!prompt.contains("half eaten"));
    assert!(prompt.contains("(empty plate:0.55),"));
}

#[test]
fn prompt_for_full_pizza() {
    let prompt = pizza_prompt(weights(12, 12));
    assert!(prompt.contains("(empty plate:0.00),"));
}

// =============================================================================
// Request assembly
// =============================================================================

#[test]
fn seg_only_request() {
    let generator = PizzaGen { mask_seed: Some(1), ..PizzaGen::new(48, 3, 12) };
    let request = generator.build_request(&models(), None, &PromptOverrides::default(), -1).unwrap();

    assert_eq!(request.prompt, pizza_prompt(weights(3, 12)));
    assert_eq!(request.negative_prompt, PIZZA_NEGATIVE_PROMPT);
    assert!((request.cfg_scale - 2.5).abs() < f64::EPSILON);
    assert_eq!(request.steps, 20);
    assert_eq!(request.sampler_name, "DPM++ 3M SDE");
    assert_eq!((request.width, request.height), (48, 48));

    assert_eq!(request.controlnet_units.len(), 1);
    let seg = &request.controlnet_units[0];
    assert_eq!(seg.model, "control_v11p_sd15_seg [e1f51eb9]");
    assert_eq!(seg.module, "none");
    assert!((seg.weight - 3.0).abs() < f64::EPSILON);
    assert!((seg.guidance_end - 1.0).abs() < f64::EPSILON);
    assert_eq!(seg.control_mode, ControlMode::ControlNetMoreImportant);
}

#[test]
fn depth_guide_adds_unit_and_lowers_seg_weight() {
    let depth = DynamicImage::new_rgb8(10, 10);
    let request = PizzaGen::new(32, 1, 12)
        .build_request(&models(), Some(&depth), &PromptOverrides::default(), 5)
        .unwrap();

    assert_eq!(request.controlnet_units.len(), 2);
    assert!((request.controlnet_units[0].weight - 1.1).abs() < f64::EPSILON);
    let unit = &request.controlnet_units[1];
    assert_eq!(unit.model, "control_v11f1p_sd15_depth [cfd03158]");
    assert_eq!(unit.module, "depth_midas");
    assert!((unit.weight - 0.8).abs() < f64::EPSILON);
    assert!((unit.guidance_end - 0.7).abs() < f64::EPSILON);
    assert_eq!(decode_unit_image(unit).dimensions(), (10, 10));
}

#[test]
fn seg_weight_override_wins_over_depth_default() {
    let generator = PizzaGen { seg_weight: Some(2.0), ..PizzaGen::new(16, 1, 12) };
    assert!((generator.seg_weight(true) - 2.0).abs() < f64::EPSILON);
    assert!((generator.seg_weight(false) - 2.0).abs() < f64::EPSILON);
}

#[test]
fn prompt_overrides_apply() {
    let overrides = PromptOverrides { prompt: Some("a pizza".into()), negative_prompt: Some("cold".into()) };
    let request = PizzaGen::new(16, 1, 12).build_request(&models(), None, &overrides, -1).unwrap();
    assert_eq!(request.prompt, "a pizza");
    assert_eq!(request.negative_prompt, "cold");
}

#[test]
fn missing_depth_model_only_matters_with_guide() {
    let models = vec!["control_v11p_sd15_seg".to_string()];
    let generator = PizzaGen::new(16, 1, 12);
    assert!(generator.build_request(&models, None, &PromptOverrides::default(), -1).is_ok());

    let depth = DynamicImage::new_rgb8(4, 4);
    let err = generator
        .build_request(&models, Some(&depth), &PromptOverrides::default(), -1)
        .unwrap_err();
    assert!(err.to_string().contains("sd15_depth"));
}

#[test]
fn invalid_counts_are_rejected() {
    let err = PizzaGen::new(16, 13, 12)
        .build_request(&models(), None, &PromptOverrides::default(), -1)
        .unwrap_err();
    assert!(matches!(err, GenerateError::Guide(_)));
    let err = PizzaGen::new(16, 0, 0).prompt_weights().unwrap_err();
    assert!(matches!(err, GenerateError::Guide(_)));
}

// =============================================================================
// Segmentation mask
// =============================================================================

#[test]
fn whole_pizza_mask_is_food_inside() {
    let generator = PizzaGen { mask_seed: Some(9), ..PizzaGen::new(100, 12, 12) };
    let request = generator.build_request(&models(), None, &PromptOverrides::default(), -1).unwrap();
    let mask = decode_unit_image(&request.controlnet_units[0]);
    assert_eq!(mask.get_pixel(50, 20).0, [255, 204, 0, 255]);
    assert_eq!(mask.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn empty_plate_mask_shows_dish() {
    let png = PizzaGen::new(100, 0, 12).segmentation_png().unwrap();
    let mask = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(mask.get_pixel(50, 50).0, [255, 41, 10, 255]);
}

#[test]
fn seeded_masks_repeat() {
    let generator = PizzaGen { mask_seed: Some(77), ..PizzaGen::new(64, 5, 12) };
    assert_eq!(generator.segmentation_png().unwrap(), generator.segmentation_png().unwrap());
}

#[test]
fn debug_dir_receives_mask() {
    let dir = tempfile::tempdir().unwrap();
    let generator = PizzaGen { debug_dir: Some(dir.path().to_path_buf()), ..PizzaGen::new(16, 2, 12) };
    generator.segmentation_png().unwrap();
    assert!(dir.path().join("debug_seg_image.png").exists());
}

// =============================================================================
// Generate
// =============================================================================

#[tokio::test]
async fn generate_round_trip_through_backend() {
    let backend = MockBackend::standard();
    let result = PizzaGen::new(40, 4, 8)
        .generate(&backend, None, &PromptOverrides::default(), 99)
        .await
        .unwrap();
    assert_eq!(result.image.width(), 40);
    let request = backend.last_request();
    assert_eq!(request.seed, 99);
    assert!(request.prompt.contains("(empty plate:0.55),"));
}
