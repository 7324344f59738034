use lognote::color::Color;
use lognote::config::Config;
use lognote::document::EditState;
use lognote::group::GroupEvent;
use lognote::rich_line::TextFormat;
use lognote::sorter::{SortKey, SortOrder};
use lognote::{LogNoteError, Session};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use zip::write::SimpleFileOptions;

fn build_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    for (entry, content) in entries {
        writer
            .start_file(*entry, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn small_chunks() -> Config {
    let mut config = Config::default();
    config.chunk_lines = 10;
    config
}

#[test]
fn test_large_file_is_split_into_numbered_parts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.log");
    let content: String = (1..=25).map(|i| format!("line {i}\n")).collect();
    fs::write(&path, content).unwrap();

    let mut session = Session::new(&small_chunks()).unwrap();
    let parts = session.open_file(&path, "big", None).unwrap();

    let names: Vec<_> = parts.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, ["1-big.log", "2-big.log", "3-big.log"]);
    let files: Vec<_> = session
        .registry()
        .list_files("big")
        .iter()
        .map(|f| f.display_name.clone())
        .collect();
    assert_eq!(files, names);

    let primary = session.primary().unwrap();
    assert_eq!(primary.display_name, "1-big.log");
    assert!(primary.text.starts_with("line 1\n"));
    assert!(primary.text.ends_with("line 10\n"));
}

#[test]
fn test_same_named_entries_from_two_archives() {
    let dir = tempfile::tempdir().unwrap();
    let first = build_zip(dir.path(), "a.zip", &[("logs/app.log", "from a\n")]);
    let second = build_zip(dir.path(), "b.zip", &[("app.log", "from b\n")]);

    let mut session = Session::new(&Config::default()).unwrap();
    session
        .open_archive_entries(&first, &["logs/app.log"], "a", None)
        .unwrap();
    session
        .open_archive_entries(&second, &["app.log"], "b", Some(Color::YELLOW))
        .unwrap();

    let a = session.registry().file_path("a", "app.log").unwrap();
    let b = session.registry().file_path("b", "app.log").unwrap();
    assert_ne!(a, b);
    assert!(a.starts_with(session.temp_dir()));
    assert_eq!(fs::read_to_string(a).unwrap(), "from a\n");
    assert_eq!(fs::read_to_string(b).unwrap(), "from b\n");
    assert_eq!(session.registry().color_of("b"), Some(Color::YELLOW));
}

#[test]
fn test_missing_archive_entry_reports_entry_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let zip = build_zip(dir.path(), "a.zip", &[("app.log", "x\n")]);

    let mut session = Session::new(&Config::default()).unwrap();
    let err = session
        .open_archive_entries(&zip, &["nope.log"], "g", None)
        .unwrap_err();
    assert!(matches!(err, LogNoteError::EntryNotFound { .. }));
    assert!(session.registry().is_empty());
}

#[test]
fn test_failing_entry_files_nothing_from_archive() {
    let dir = tempfile::tempdir().unwrap();
    let zip = build_zip(dir.path(), "a.zip", &[("app.log", "x\n")]);
    let other = dir.path().join("other.log");
    fs::write(&other, "keep\n").unwrap();

    let mut session = Session::new(&Config::default()).unwrap();
    session.open_file(&other, "kept", None).unwrap();
    let err = session
        .open_archive_entries(&zip, &["app.log", "nope.log"], "g", None)
        .unwrap_err();

    assert!(matches!(err, LogNoteError::EntryNotFound { .. }));
    assert_eq!(session.registry().group_names(), ["kept"]);
    assert_eq!(session.primary().unwrap().text, "keep\n");
}

#[test]
fn test_archive_entries_show_first_extracted_part() {
    let dir = tempfile::tempdir().unwrap();
    let zip = build_zip(
        dir.path(),
        "a.zip",
        &[("first.log", "one\n"), ("second.log", "two\n")],
    );

    let mut session = Session::new(&Config::default()).unwrap();
    let parts = session
        .open_archive_entries(&zip, &["first.log", "second.log"], "g", None)
        .unwrap();

    assert_eq!(parts.len(), 2);
    assert_eq!(session.registry().list_files("g").len(), 2);
    assert_eq!(session.primary().unwrap().display_name, "first.log");
}

#[test]
fn test_temp_files_removed_with_session() {
    let dir = tempfile::tempdir().unwrap();
    let zip = build_zip(dir.path(), "a.zip", &[("app.log", "x\n")]);

    let temp_dir = {
        let mut session = Session::new(&Config::default()).unwrap();
        session
            .open_archive_entries(&zip, &["app.log"], "g", None)
            .unwrap();
        session.temp_dir().to_path_buf()
    };
    assert!(!temp_dir.exists());
}

#[test]
fn test_group_observer_sees_open_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.log");
    fs::write(&path, "a\n").unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(&Config::default()).unwrap();
    let sink = Rc::clone(&events);
    session
        .registry_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));

    session.open_file(&path, "g", None).unwrap();
    session.close_group("g");

    let events = events.borrow();
    assert!(matches!(events.first(), Some(GroupEvent::GroupCreated { .. })));
    assert!(matches!(events.last(), Some(GroupEvent::GroupRemoved { .. })));
    assert!(session.primary().is_none());
}

#[test]
fn test_search_walks_matches_in_shown_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.log");
    fs::write(&path, "1: ok\n2: WARN x\n3: warn y\n").unwrap();

    let mut session = Session::new(&Config::default()).unwrap();
    session.open_file(&path, "g", None).unwrap();

    assert_eq!(session.find_next("WARN").map(|m| m.start), Some(9));
    assert_eq!(session.find_next("WARN").map(|m| m.start), Some(19));
    assert_eq!(session.find_next("WARN"), None);
    assert_eq!(session.find_previous("WARN").map(|m| m.start), Some(9));

    session.set_case_sensitive(true);
    let lines: Vec<_> = session
        .find_all("WARN")
        .iter()
        .map(|m| m.line_number)
        .collect();
    assert_eq!(lines, [2]);
}

#[test]
fn test_curated_sort_can_be_undone_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.log");
    fs::write(
        &path,
        "[2024-01-15 10:30:47] c\n[2024-01-15 10:30:45] a\nno timestamp\n",
    )
    .unwrap();

    let mut session = Session::new(&Config::default()).unwrap();
    session.open_file(&path, "g", None).unwrap();
    for line in 1..=3 {
        assert!(session.curate_line(line));
    }
    session.format_selection(0..4, TextFormat::foreground(Color::rgb(255, 0, 0)));
    let before = session.document().lines().to_vec();

    let document = session.document_mut();
    document.sort(SortOrder::Ascending, SortKey::Timestamp);
    assert_eq!(document.state(), EditState::Sorted);
    let texts: Vec<_> = document.lines().iter().map(|l| l.text()).collect();
    assert_eq!(
        texts,
        [
            "no timestamp",
            "[2024-01-15 10:30:45] a",
            "[2024-01-15 10:30:47] c"
        ]
    );

    assert!(document.undo());
    assert_eq!(document.lines(), before.as_slice());
    assert_eq!(document.state(), EditState::Formatted);
    assert!(!document.undo());
}

#[test]
fn test_saved_log_reloads_with_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.log");
    fs::write(&path, "ERROR disk full\nINFO ok\n").unwrap();
    let out = dir.path().join("curated.html");

    let mut session = Session::new(&Config::default()).unwrap();
    session.open_file(&path, "g", None).unwrap();
    session.curate_line(1);
    session.curate_line(2);
    assert_eq!(
        session.format_all_occurrences("error", TextFormat::background(Color::YELLOW)),
        1
    );
    session.save_curated(&out).unwrap();

    let mut reloaded = Session::new(&Config::default()).unwrap();
    reloaded.load_curated(&out).unwrap();
    assert_eq!(reloaded.document().lines(), session.document().lines());
    assert_eq!(
        reloaded.document().lines()[0].format_at(0),
        TextFormat::background(Color::YELLOW)
    );
}

#[test]
fn test_loading_missing_curated_log_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(&Config::default()).unwrap();
    session.document_mut().append_text("keep me");

    let err = session
        .load_curated(&dir.path().join("missing.html"))
        .unwrap_err();
    assert!(matches!(err, LogNoteError::FileOpen { .. }));
    assert_eq!(session.document().len(), 1);
}
