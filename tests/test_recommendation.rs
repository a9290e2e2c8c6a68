//! Integration test: fit-at-startup recommendation flow end-to-end

use agrifert::dataset::FertilizerDataset;
use agrifert::engine::{RecommendRequest, Recommender, Suggestion};
use agrifert::error::AgrifertError;
use agrifert::npk::NpkRatio;

fn bundled_dataset() -> FertilizerDataset {
    let path = format!("{}/data/fertilizer.csv", env!("CARGO_MANIFEST_DIR"));
    FertilizerDataset::from_csv(&path).expect("bundled dataset should load")
}

fn fitted_recommender() -> Recommender {
    // Small forest keeps the test fast; seed fixes the fit
    Recommender::fit_with(&bundled_dataset(), 25, 42).expect("fit should succeed")
}

fn base_request() -> RecommendRequest {
    RecommendRequest {
        temperature: 30.0,
        humidity: 60.0,
        moisture: 40.0,
        soil_type: "Loamy".to_string(),
        crop_type: "Maize".to_string(),
        nitrogen: 20.0,
        potassium: 15.0,
        phosphorous: 10.0,
        land_area: 1.0,
    }
}

#[test]
fn test_recommendation_returns_known_fertilizer() {
    let recommender = fitted_recommender();
    let rec = recommender.recommend(&base_request()).unwrap();

    assert!(
        recommender.fertilizer_names().contains(&rec.fertilizer),
        "'{}' is not a fit-time fertilizer label",
        rec.fertilizer
    );
    assert!(rec.crop_fallback.is_none());
}

#[test]
fn test_recommendation_is_deterministic() {
    let recommender = fitted_recommender();
    let request = base_request();

    let first = recommender.recommend(&request).unwrap();
    let second = recommender.recommend(&request).unwrap();
    assert_eq!(first.fertilizer, second.fertilizer);
    assert_eq!(first.total_amount, second.total_amount);
    assert_eq!(first.optimized_amount, second.optimized_amount);

    // A second fit with the same seed gives the same answer
    let refitted = fitted_recommender();
    let third = refitted.recommend(&request).unwrap();
    assert_eq!(first.fertilizer, third.fertilizer);
    assert_eq!(first.total_amount, third.total_amount);
}

#[test]
fn test_optimized_amount_scales_with_land_area() {
    let recommender = fitted_recommender();

    let mut request = base_request();
    let rec_one = recommender.recommend(&request).unwrap();

    request.land_area = 2.0;
    let rec_two = recommender.recommend(&request).unwrap();

    // Same features, so the predicted total is identical; only the
    // per-area amount divides by the land area.
    assert_eq!(rec_one.total_amount, rec_two.total_amount);
    assert!((rec_two.optimized_amount - rec_one.total_amount / 2.0).abs() < 1e-9);
}

#[test]
fn test_unknown_crop_falls_back() {
    let recommender = fitted_recommender();

    let mut request = base_request();
    request.crop_type = "Quinoa".to_string();

    let rec = recommender.recommend(&request).unwrap();
    let first_crop = recommender.crop_types()[0].clone();
    assert_eq!(rec.crop_fallback.as_deref(), Some(first_crop.as_str()));
    assert!(recommender.fertilizer_names().contains(&rec.fertilizer));
}

#[test]
fn test_unknown_soil_fails() {
    let recommender = fitted_recommender();

    let mut request = base_request();
    request.soil_type = "Chalky".to_string();

    let err = recommender.recommend(&request).unwrap_err();
    assert!(matches!(
        err,
        AgrifertError::UnknownCategory { ref value, .. } if value == "Chalky"
    ));
}

#[test]
fn test_non_positive_land_area_fails() {
    let recommender = fitted_recommender();

    let mut request = base_request();
    request.land_area = 0.0;
    assert!(matches!(
        recommender.recommend(&request),
        Err(AgrifertError::InvalidInput(_))
    ));

    request.land_area = -3.0;
    assert!(matches!(
        recommender.recommend(&request),
        Err(AgrifertError::InvalidInput(_))
    ));
}

#[test]
fn test_npk_split_matches_fertilizer_name() {
    let recommender = fitted_recommender();
    let rec = recommender.recommend(&base_request()).unwrap();

    match NpkRatio::parse(&rec.fertilizer) {
        Some(_) => {
            let npk = rec.npk.expect("ratio-named fertilizer should carry a split");
            let sum = npk.nitrogen + npk.phosphorous + npk.potassium;
            assert!((sum - rec.optimized_amount).abs() < 1e-9);
        }
        None => assert!(rec.npk.is_none()),
    }
}

#[test]
fn test_suggestion_follows_policy() {
    let recommender = fitted_recommender();
    let request = base_request();
    let rec = recommender.recommend(&request).unwrap();

    let current_total = request.nitrogen + request.potassium + request.phosphorous;
    let expected = Suggestion::from_amounts(rec.optimized_amount, current_total);
    assert_eq!(rec.suggestion, expected);
}

#[test]
fn test_encoder_classes_exposed_for_ui() {
    let recommender = fitted_recommender();

    assert_eq!(recommender.soil_types().len(), 5);
    assert_eq!(recommender.crop_types().len(), 11);
    assert_eq!(recommender.fertilizer_names().len(), 7);
    assert!(recommender.soil_types().contains(&"Sandy".to_string()));
}
