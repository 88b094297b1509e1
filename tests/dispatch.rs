//! End-to-end dispatch scenarios: raw command line in, recorded spawns and
//! notifications out.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use wayline::{
    Config, Dispatcher, HostEnv, Invocation, MemoryNotifier, Selection, SpawnError, SpawnOutcome,
    Spawner,
};

type SpawnHook = Box<dyn Fn(&Invocation) -> Result<SpawnOutcome, SpawnError>>;

/// Records every invocation and answers with whatever the hook says.
struct RecordingSpawner {
    calls: RefCell<Vec<Invocation>>,
    hook: SpawnHook,
}

impl RecordingSpawner {
    fn ok() -> Self {
        Self::with_hook(Box::new(|invocation| {
            if invocation.detached {
                Ok(SpawnOutcome::Detached)
            } else {
                Ok(SpawnOutcome::exited(Some(0)))
            }
        }))
    }

    fn with_hook(hook: SpawnHook) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            hook,
        }
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl Spawner for RecordingSpawner {
    fn spawn(&self, invocation: &Invocation) -> Result<SpawnOutcome, SpawnError> {
        self.calls.borrow_mut().push(invocation.clone());
        (self.hook)(invocation)
    }
}

struct Harness {
    dir: TempDir,
    dispatcher: Dispatcher,
    spawner: RecordingSpawner,
    notifier: MemoryNotifier,
    selection: Selection,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        Self {
            dir: tempdir().unwrap(),
            dispatcher: Dispatcher::with_config(config).unwrap(),
            spawner: RecordingSpawner::ok(),
            notifier: MemoryNotifier::new(),
            selection: Selection::default(),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, "contents").unwrap();
        path
    }

    fn env(&self) -> HostEnv<'_> {
        HostEnv {
            cwd: self.dir.path(),
            selection: &self.selection,
            spawner: &self.spawner,
            notifier: &self.notifier,
        }
    }

    fn run(&self, raw: &str) {
        self.dispatcher.run(raw, &self.env());
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn arg(path: &Path) -> OsString {
    path.into()
}

#[test]
fn vscode_on_the_focused_entry_spawns_once_detached() {
    let mut harness = Harness::new();
    let focused = harness.file("x.txt");
    harness.selection = Selection::focused(&focused);

    harness.run(":vscode");

    assert_eq!(
        harness.spawner.calls(),
        vec![Invocation::detached(vec!["code".into(), arg(&focused)])]
    );
    assert!(harness.notifier.errors().is_empty());
}

#[test]
fn vscode_on_marks_spawns_per_mark_in_order() {
    let mut harness = Harness::new();
    let a = harness.file("a");
    let b = harness.file("b");
    harness.selection = Selection {
        focused: Some(harness.file("ignored")),
        marked: vec![a.clone(), b.clone()],
    };

    harness.run(":vscode");

    assert_eq!(
        harness.spawner.calls(),
        vec![
            Invocation::detached(vec!["code".into(), arg(&a)]),
            Invocation::detached(vec!["code".into(), arg(&b)]),
        ]
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_file_names_reach_the_child_byte_for_byte() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mut harness = Harness::new();
    let name = OsStr::from_bytes(b"caf\xe9.txt");
    let path = harness.dir.path().join(name);
    fs::write(&path, "contents").unwrap();
    harness.selection = Selection::focused(&path);

    harness.run(":vscode");

    let calls = harness.spawner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argv[1], path.as_os_str());
}

#[test]
fn trash_skips_a_missing_target_and_keeps_going() {
    let mut harness = Harness::new();
    let one = harness.file("one");
    let two = harness.dir.path().join("two");
    let three = harness.file("three");
    harness.selection = Selection {
        focused: None,
        marked: vec![one.clone(), two.clone(), three.clone()],
    };

    harness.run(":trash");

    assert_eq!(
        harness.spawner.calls(),
        vec![
            Invocation::detached(vec!["trash-put".into(), arg(&one)]),
            Invocation::detached(vec!["trash-put".into(), arg(&three)]),
        ]
    );
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("two"));
    assert!(errors[0].contains("no such file"));
}

#[test]
fn unknown_command_is_reported_not_fatal() {
    let harness = Harness::new();
    harness.run(":frobnicate now");
    assert!(harness.spawner.calls().is_empty());
    assert_eq!(
        harness.notifier.errors(),
        vec!["unknown command: frobnicate".to_string()]
    );
}

#[test]
fn blank_input_is_a_no_op() {
    let harness = Harness::new();
    harness.run(":");
    harness.run("   ");
    assert!(harness.spawner.calls().is_empty());
    assert!(harness.notifier.take().is_empty());
}

#[test]
fn default_alias_routes_to_the_canonical_command() {
    let mut harness = Harness::new();
    let focused = harness.file("doomed");
    harness.selection = Selection::focused(&focused);

    harness.run(":rm");

    assert_eq!(
        harness.spawner.calls(),
        vec![Invocation::detached(vec![
            "trash-put".into(),
            arg(&focused)
        ])]
    );
}

#[test]
fn empty_selection_on_a_target_command_is_one_error() {
    let harness = Harness::new();
    harness.run(":vscode");
    assert!(harness.spawner.calls().is_empty());
    assert_eq!(
        harness.notifier.errors(),
        vec!["vscode: nothing is selected".to_string()]
    );
}

#[test]
fn missing_required_argument_names_the_usage() {
    let harness = Harness::new();
    harness.run(":git");
    assert!(harness.spawner.calls().is_empty());
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("usage: git <url>"));
}

#[test]
fn edit_rejects_a_nonexistent_path_before_spawning() {
    let harness = Harness::new();
    harness.run(":edit nope.txt");
    assert!(harness.spawner.calls().is_empty());
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("no such file"));
}

#[test]
fn edit_takes_the_rest_of_the_line_as_one_path() {
    let mut harness = Harness::new();
    let spaced = harness.file("two words.txt");
    harness.selection = Selection::focused(harness.file("other"));

    harness.run(":edit two words.txt");

    let calls = harness.spawner.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].detached);
    assert_eq!(calls[0].argv[1], spaced.as_os_str());
}

#[test]
fn edit_visits_every_marked_entry_in_order() {
    let mut harness = Harness::new();
    let a = harness.file("a.txt");
    let b = harness.file("b.txt");
    harness.selection = Selection::marked([a.clone(), b.clone()]);

    harness.run(":edit");

    let calls = harness.spawner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].argv[1], a.as_os_str());
    assert_eq!(calls[1].argv[1], b.as_os_str());
    assert!(calls.iter().all(|call| !call.detached));
    assert!(harness.notifier.errors().is_empty());
    assert_eq!(harness.notifier.infos().len(), 2);
}

#[test]
fn edit_reports_an_editor_killed_by_a_signal() {
    let mut harness = Harness::new();
    let focused = harness.file("x.txt");
    harness.selection = Selection::focused(&focused);
    harness.spawner = RecordingSpawner::with_hook(Box::new(|_| {
        // Signal death: the child never produced an exit code.
        Ok(SpawnOutcome::exited(None))
    }));

    harness.run(":edit");

    assert!(harness.notifier.infos().is_empty());
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("editor exited with status unknown"));
}

#[test]
fn command_name_completion_is_prefix_filtered_and_sorted() {
    let harness = Harness::new();
    let env = harness.env();
    assert_eq!(
        harness.dispatcher.complete(":vs", &env),
        vec!["vscode", "vscodedir"]
    );
    assert!(
        harness
            .dispatcher
            .complete("", &env)
            .contains(&"trash".to_string())
    );
}

#[test]
fn argument_completion_comes_from_the_browsing_directory() {
    let harness = Harness::new();
    harness.file("alpha.txt");
    harness.file("beta.txt");
    let env = harness.env();
    assert_eq!(
        harness.dispatcher.complete(":edit al", &env),
        vec!["alpha.txt"]
    );
    assert_eq!(
        harness.dispatcher.complete(":edit ", &env),
        vec!["alpha.txt", "beta.txt"]
    );
}

#[test]
fn rename_edit_round_trips_through_the_editor() {
    let mut harness = Harness::new();
    let old = harness.file("old.txt");
    harness.selection = Selection::focused(&old);
    harness.spawner = RecordingSpawner::with_hook(Box::new(|invocation| {
        // Stand in for the editor: rewrite the scratch file's one line.
        fs::write(&invocation.argv[1], "new.txt\n").unwrap();
        Ok(SpawnOutcome::exited(Some(0)))
    }));

    harness.run(":rename_edit");

    assert_eq!(harness.entries(), vec!["new.txt"]);
    assert!(harness.notifier.errors().is_empty());
    let infos = harness.notifier.infos();
    assert_eq!(infos, vec!["Renamed old.txt -> new.txt".to_string()]);
}

#[test]
fn rename_edit_rejects_empty_content_and_cleans_up() {
    let mut harness = Harness::new();
    let old = harness.file("old.txt");
    harness.selection = Selection::focused(&old);
    harness.spawner = RecordingSpawner::with_hook(Box::new(|invocation| {
        fs::write(&invocation.argv[1], "").unwrap();
        Ok(SpawnOutcome::exited(Some(0)))
    }));

    harness.run(":rename_edit");

    // Nothing renamed, scratch file gone, exactly one error.
    assert_eq!(harness.entries(), vec!["old.txt"]);
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("empty"));
}

#[test]
fn rename_edit_cleans_up_when_the_editor_fails() {
    let mut harness = Harness::new();
    let old = harness.file("old.txt");
    harness.selection = Selection::focused(&old);
    harness.spawner =
        RecordingSpawner::with_hook(Box::new(|_| Ok(SpawnOutcome::exited(Some(1)))));

    harness.run(":rename_edit");

    assert_eq!(harness.entries(), vec!["old.txt"]);
    assert_eq!(harness.notifier.errors().len(), 1);
}

#[test]
fn rename_edit_treats_a_signal_killed_editor_as_a_failure() {
    let mut harness = Harness::new();
    let old = harness.file("old.txt");
    harness.selection = Selection::focused(&old);
    harness.spawner = RecordingSpawner::with_hook(Box::new(|invocation| {
        // The editor wrote a new name, then died to a signal; the rename
        // must not proceed on a half-finished edit.
        fs::write(&invocation.argv[1], "new.txt\n").unwrap();
        Ok(SpawnOutcome::exited(None))
    }));

    harness.run(":rename_edit");

    assert_eq!(harness.entries(), vec!["old.txt"]);
    assert_eq!(harness.notifier.errors().len(), 1);
}

#[test]
fn copy_content_refuses_a_directory_target() {
    let mut harness = Harness::new();
    let sub = harness.dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    harness.selection = Selection::focused(&sub);

    harness.run(":copy_content");

    assert!(harness.spawner.calls().is_empty());
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("not a regular file"));
}

#[test]
fn copy_content_quotes_awkward_paths_for_the_shell() {
    let mut harness = Harness::new();
    let awkward = harness.file("it's here.txt");
    harness.selection = Selection::focused(&awkward);

    harness.run(":copy_content");

    let calls = harness.spawner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argv[0], "/bin/sh");
    let script = calls[0].argv[2].to_str().unwrap();
    // The quoted path must survive a shell re-split intact.
    let words = shlex::split(script.strip_prefix("xclip -sel c < ").unwrap()).unwrap();
    assert_eq!(words, vec![awkward.to_str().unwrap().to_string()]);
}

#[test]
fn user_config_command_spawns_per_target() {
    let config = Config::from_toml(
        r#"
        [commands.view]
        argv = ["viewer", "{}"]
        per_target = true
        "#,
    )
    .unwrap();
    let mut harness = Harness::with_config(config);
    let a = harness.file("a.png");
    let b = harness.file("b.png");
    harness.selection = Selection::marked([a.clone(), b.clone()]);

    harness.run(":view");

    assert_eq!(
        harness.spawner.calls(),
        vec![
            Invocation::detached(vec!["viewer".into(), arg(&a)]),
            Invocation::detached(vec!["viewer".into(), arg(&b)]),
        ]
    );
}

#[test]
fn user_config_command_can_collide_with_a_builtin() {
    let config = Config::from_toml(
        r#"
        [commands.trash]
        argv = ["rm", "-rf", "{}"]
        "#,
    )
    .unwrap();
    assert!(Dispatcher::with_config(config).is_err());
}

#[test]
fn selection_independent_commands_ignore_the_marks() {
    let mut harness = Harness::new();
    harness.selection = Selection::marked([harness.file("a"), harness.file("b")]);

    harness.run(":vscodedir");

    assert_eq!(
        harness.spawner.calls(),
        vec![Invocation::detached(vec![
            "code".into(),
            arg(harness.dir.path()),
            "-n".into(),
        ])]
    );
}
