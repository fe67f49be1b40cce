use std::fs;

use kotlin_tasks::{
    ExtractionConfig, ExtractionPipeline, SplitConfig, TaskCategory, TaskRecord, ValidityConfig,
    load_jsonl_file, summarize_dir, train_test_split,
};
use tempfile::tempdir;

const SAMPLE: &str = include_str!("fixtures/Sample.kt");

#[test]
fn extract_write_summarize_and_split() {
    let temp = tempdir().unwrap();
    let sources = temp.path().join("sources");
    let tasks_dir = temp.path().join("tasks");
    let split_dir = temp.path().join("split");
    fs::create_dir_all(sources.join("app")).unwrap();
    fs::write(sources.join("app/Sample.kt"), SAMPLE).unwrap();
    fs::write(
        sources.join("Extra.kt"),
        "val retries = 5\nfor (item in queue) {\n    handle(item)\n}\n",
    )
    .unwrap();
    fs::write(sources.join("README.md"), "val ignored = 1\n").unwrap();

    let pipeline = ExtractionPipeline::new(ExtractionConfig::default()).unwrap();
    let tasks = pipeline.extract_dir(&sources).unwrap();
    assert!(tasks.body(TaskCategory::Variable, "val ignored =").is_none());
    assert_eq!(
        tasks.body(TaskCategory::Variable, "val retries ="),
        Some("<NUM_LIT><EOL>")
    );

    let written = pipeline.write_tasks(&tasks, &tasks_dir).unwrap();
    assert_eq!(written.len(), TaskCategory::ALL.len());
    for file in &written {
        let on_disk = load_jsonl_file(&file.path).unwrap();
        assert_eq!(on_disk, tasks.records(file.category));
    }

    let summary = summarize_dir(&tasks_dir).unwrap();
    assert_eq!(summary.total, tasks.total());
    assert_eq!(summary.files.len(), TaskCategory::ALL.len());
    assert_eq!(summary.files[0].file, "condition_tasks.jsonl");

    let outcome = train_test_split(&SplitConfig::new(&tasks_dir, &split_dir).with_seed(42)).unwrap();
    let total = tasks.total();
    assert_eq!(outcome.train, (total as f64 * 0.8).floor() as usize);
    assert_eq!(outcome.train + outcome.test, total);

    let mut split_records = load_jsonl_file(&outcome.train_path).unwrap();
    split_records.extend(load_jsonl_file(&outcome.test_path).unwrap());
    let mut expected: Vec<TaskRecord> = TaskCategory::ALL
        .into_iter()
        .flat_map(|category| tasks.records(category))
        .collect();
    let key = |record: &TaskRecord| (record.signature.clone(), record.body.clone());
    split_records.sort_by_key(key);
    expected.sort_by_key(key);
    assert_eq!(split_records, expected);
}

#[test]
fn repeated_runs_append_to_task_files() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("tasks");
    let pipeline = ExtractionPipeline::new(ExtractionConfig::default()).unwrap();
    let tasks = pipeline.extract_text("val a = 1\nval b = 2\n");

    pipeline.write_tasks(&tasks, &out).unwrap();
    pipeline.write_tasks(&tasks, &out).unwrap();

    let summary = summarize_dir(&out).unwrap();
    assert_eq!(summary.total, 4);
    let variable = summary
        .files
        .iter()
        .find(|entry| entry.file == "variable_tasks.jsonl")
        .unwrap();
    assert_eq!(variable.records, 4);
    assert!((variable.share - 1.0).abs() < 1e-9);
}

#[test]
fn validity_profile_changes_what_is_kept() {
    let body = "x".repeat(600);
    let text = format!("fun big() {{ {body} }}\n");

    let v1 = ExtractionPipeline::new(ExtractionConfig::default().with_validity(ValidityConfig::v1()))
        .unwrap();
    let v2 = ExtractionPipeline::new(ExtractionConfig::default()).unwrap();

    assert_eq!(v1.extract_text(&text).len(TaskCategory::Function), 0);
    assert_eq!(v2.extract_text(&text).len(TaskCategory::Function), 1);
}

#[test]
fn non_ascii_function_within_character_cap_is_kept() {
    let text = format!("fun big() {{ \"{}\" }}\n", "é".repeat(300));
    assert!(text.len() > 500);

    let v1 = ExtractionPipeline::new(ExtractionConfig::default().with_validity(ValidityConfig::v1()))
        .unwrap();
    let tasks = v1.extract_text(&text);
    assert_eq!(
        tasks.records(TaskCategory::Function),
        vec![TaskRecord::new("fun big() {", "<STR_LIT> }")]
    );
}

#[test]
fn unreadable_source_directory_is_fatal() {
    let temp = tempdir().unwrap();
    let pipeline = ExtractionPipeline::new(ExtractionConfig::default()).unwrap();
    assert!(pipeline.extract_dir(&temp.path().join("missing")).is_err());
}
