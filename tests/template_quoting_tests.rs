//! Command template expansion against a real shell
#![cfg(unix)]

use dirstat_cleanup::cleanup::{
    template, CleanupAction, CleanupCatalog, ExpansionContext, SelectedEntry, Selection,
};
use std::path::PathBuf;
use std::process::Command;

fn echo_through_shell(line: &str) -> String {
    let output = Command::new("/bin/sh").arg("-c").arg(line).output().unwrap();
    assert!(output.status.success(), "{line}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_hostile_names_reach_the_command_verbatim() {
    let names = [
        "plain",
        "with space",
        "it's",
        "double\"quote",
        "semi;colon",
        "$(touch pwned)",
        "`backtick`",
        "star*glob?",
        "new\nline",
        "-rf",
        "ünïcødé",
    ];
    let mut ctx = ExpansionContext::new("/trash");
    for name in names {
        let entry = SelectedEntry::file(PathBuf::from("/tmp/dir").join(name));
        let line = template::expand("echo %n", &entry, &mut ctx).unwrap();
        let printed = echo_through_shell(&line);
        let expected = if name.starts_with('-') {
            format!("./{name}\n")
        } else {
            format!("{name}\n")
        };
        assert_eq!(printed, expected, "name {name:?} expanded to {line:?}");
    }
}

#[test]
fn test_path_placeholder_is_one_word() {
    let entry = SelectedEntry::directory("/home/user/My Documents/a;b");
    let line =
        template::expand("ls -d %p", &entry, &mut ExpansionContext::new("/trash")).unwrap();
    let words = shell_words::split(&line).unwrap();
    assert_eq!(words, ["ls", "-d", "/home/user/My Documents/a;b"]);
}

#[test]
fn test_user_action_from_config() {
    let config = dirstat_cleanup::config::EngineConfig::from_toml_str(
        r#"
disabled = ["cleanupOpenInTerminal"]

[[action]]
id = "cleanupDu"
title = "Disk &usage"
command = "du -sh %p"
works_for_file = false
"#,
    )
    .unwrap();
    let catalog = CleanupCatalog::from_config(&config).unwrap();

    let du: &CleanupAction = catalog.get("cleanupDu").unwrap();
    assert_eq!(du.clean_title(), "Disk usage");
    assert_eq!(catalog.iter().last().unwrap().id(), "cleanupDu");

    let dir = Selection::single(SelectedEntry::directory("/var/log"));
    let ids: Vec<&str> = catalog
        .applicable_actions(&dir)
        .into_iter()
        .map(CleanupAction::id)
        .collect();
    assert!(ids.contains(&"cleanupDu"));
    assert!(!ids.contains(&"cleanupOpenInTerminal"));

    let file = Selection::single(SelectedEntry::file("/var/log/syslog"));
    assert!(!catalog
        .applicable_actions(&file)
        .iter()
        .any(|a| a.id() == "cleanupDu"));
}
