use serde_json::Value;
use simlab::simulator::{WebElementary, WebEpidemic, WebLife, WebVariates};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[test]
#[wasm_bindgen_test]
fn epidemic_from_json_steps_and_reports_counts() {
    let parameters = r#"
{
    "rows": 12,
    "cols": 10,
    "initInfected": 4,
    "pInfect": 0.3,
    "pRecover": 0.05,
    "pDie": 0.01,
    "seeding": "distinct"
}"#;
    let mut web = WebEpidemic::post_json(parameters, Some(21)).unwrap();
    assert_eq!(web.rows(), 12);
    assert_eq!(web.cols(), 10);
    assert_eq!(web.cells().iter().filter(|code| **code == 2).count(), 4);

    let record: Value = serde_json::from_str(&web.step_json().unwrap()).unwrap();
    assert_eq!(record["t"], 1);
    let records: Value = serde_json::from_str(&web.step_n_json(9).unwrap()).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 9);
    assert_eq!(web.t(), 10.0);

    let counts: Value = serde_json::from_str(&web.counts_json().unwrap()).unwrap();
    let total: u64 = ["empty", "susceptible", "infected", "recovered", "dead"]
        .iter()
        .map(|state| counts[*state].as_u64().unwrap())
        .sum();
    assert_eq!(total, 120);
    assert!(web.cells().iter().all(|code| *code <= 4));

    let snapshot: Value = serde_json::from_str(&web.get_json().unwrap()).unwrap();
    assert_eq!(snapshot["t"], 10);
    assert_eq!(snapshot["parameters"]["initInfected"], 4);
    assert!(snapshot.get("rng").is_none());
}

#[test]
#[wasm_bindgen_test]
fn epidemic_from_yaml_accepts_obstacles() {
    let parameters = "
rows: 6
cols: 6
initInfected: 2
pInfect: 0.5
pRecover: 0.1
pDie: 0.0
";
    let mut web = WebEpidemic::post_yaml(parameters, Some(4)).unwrap();
    web.set_cell(0, 0, 0).unwrap();
    assert_eq!(web.cells()[0], 0);
    web.step_until_contained_json(10_000).unwrap();
    assert!(web.status().starts_with("Contained"));
    assert_eq!(web.cells()[0], 0);
    assert!(web.get_yaml().unwrap().contains("initInfected: 2"));
}

#[test]
#[wasm_bindgen_test]
fn default_epidemic_parameters_round_trip() {
    let defaults = WebEpidemic::default_parameters_json().unwrap();
    let web = WebEpidemic::post_json(&defaults, Some(1)).unwrap();
    assert_eq!(web.rows(), 60);
    assert_eq!(web.cols(), 60);
}

#[test]
#[wasm_bindgen_test]
fn life_blinker_in_the_browser() {
    let mut web = WebLife::post(5, 5, Some(3)).unwrap();
    for col in 1..4 {
        web.set_cell(2, col, true).unwrap();
    }
    let record: Value = serde_json::from_str(&web.step_json().unwrap()).unwrap();
    assert_eq!(record["population"], 3);
    let cells = web.cells();
    assert_eq!(cells.len(), 25);
    assert_eq!(cells[7] + cells[12] + cells[17], 3);
    web.randomize(1.0).unwrap();
    assert_eq!(web.population(), 25);
    web.clear();
    assert_eq!(web.status(), "Extinct");
    web.set_toroidal(true);
    assert!(web.get_json().unwrap().contains("toroidal"));
}

#[test]
#[wasm_bindgen_test]
fn elementary_history_is_flattened() {
    let mut web = WebElementary::post(11, 90).unwrap();
    web.step_n_json(3).unwrap();
    assert_eq!(web.history_len(), 4);
    let history = web.history();
    assert_eq!(history.len(), 44);
    assert_eq!(&history[33..44], &[0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0][..]);
    assert_eq!(web.current(), history[33..44].to_vec());
    assert_eq!(web.generation(), 3.0);
    web.reset();
    assert_eq!(web.history_len(), 1);
    assert_eq!(WebElementary::post(11, 1000).unwrap().rule(), 255);
}

#[test]
#[wasm_bindgen_test]
fn variates_by_name() {
    let mut web = WebVariates::post(Some(9));
    let draws = web.sample("poisson", "lam=4", 1000).unwrap();
    assert_eq!(draws.len(), 1000);
    assert!(draws.iter().all(|draw| draw.fract() == 0.0 && *draw >= 0.0));

    let draws: Vec<f64> = serde_json::from_str(&web.sample_json("uniform", "a=2, b=3", 50).unwrap()).unwrap();
    assert!(draws.iter().all(|draw| (2.0..3.0).contains(draw)));

    let summary: Value =
        serde_json::from_str(&web.summary_json("binomial", "n=6, p=0.5", 4000, 50).unwrap())
            .unwrap();
    assert!((summary["mean"].as_f64().unwrap() - 3.0).abs() < 0.1);
    assert_eq!(summary["histogram"]["counts"].as_array().unwrap().len(), 7);

    let names: Vec<String> = serde_json::from_str(&WebVariates::variants_json().unwrap()).unwrap();
    assert_eq!(names.len(), 9);
}
