#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for rendering packages from each corpus.
//!
//! These tests build an isolated pacman layout on disk and drive the query
//! command end to end, verifying that:
//! - installed packages render in name order with install-only fields
//! - sync databases are queried in configuration order
//! - `--readone`, `repo/name` and provider lookups select the right records
//! - package archives render with file-only fields

mod common;

use common::{PacmanFixtureBuilder, desc, tar_gz};
use insta::assert_snapshot;

fn installed() -> common::PacmanFixture {
    PacmanFixtureBuilder::new()
        .with_installed(
            "bash-5.2.026-2",
            &desc(&[
                ("NAME", &["bash"]),
                ("VERSION", &["5.2.026-2"]),
                ("DESC", &["The GNU Bourne Again shell"]),
                ("SIZE", &["9437184"]),
                ("REASON", &["0"]),
                ("LICENSE", &["GPL-3.0-or-later"]),
                ("VALIDATION", &["pgp"]),
                ("DEPENDS", &["readline>=7.0", "glibc"]),
                ("PROVIDES", &["sh"]),
            ]),
            Some(&desc(&[
                ("FILES", &["etc/", "etc/bash.bashrc", "usr/bin/bash"]),
                ("BACKUP", &["etc/bash.bashrc\td41d8cd98f00b204e9800998ecf8427e"]),
            ])),
        )
        .with_installed(
            "readline-8.2.010-1",
            &desc(&[
                ("NAME", &["readline"]),
                ("VERSION", &["8.2.010-1"]),
                ("REASON", &["1"]),
            ]),
            None,
        )
        .with_file("etc/bash.bashrc", "# edited locally\n")
        .build()
}

#[test]
fn local_records_render_in_name_order() {
    let fixture = installed();
    let (ok, out) = fixture.query(&["%n %v [%w]"]);
    assert!(ok);
    assert_snapshot!(out, @r"
    bash 5.2.026-2 [explicit]
    readline 8.2.010-1 [dependency]
    ");
}

#[test]
fn local_lists_and_reverse_dependencies() {
    let fixture = installed();
    let (ok, out) = fixture.query(&["-l", ",", "%n: %E | %N | %V", "bash", "readline"]);
    assert!(ok);
    assert_snapshot!(out, @r"
    bash: readline,glibc |  | Signature
    readline:  | bash | Unknown
    ");
}

#[test]
fn modified_backup_files_are_detected() {
    let fixture = installed();
    let (ok, out) = fixture.query(&["%M", "bash"]);
    assert!(ok);
    assert_eq!(out, "etc/bash.bashrc\n");
}

#[test]
fn human_sizes_and_verbose_none() {
    let fixture = installed();
    let (ok, out) = fixture.query(&["-H", "M", "-v", "%m|%u", "bash"]);
    assert!(ok);
    assert_eq!(out, "9.00 MiB|None\n");
}

#[test]
fn sync_only_directives_render_question_marks_locally() {
    let fixture = installed();
    let (_, out) = fixture.query(&["%n %f %g", "bash"]);
    assert_eq!(out, "bash ? ?\n");
}

#[test]
fn provider_lookup_from_stdin() {
    let fixture = installed();
    let (ok, out) = fixture.query_with_stdin(&["%n", "-"], "sh\n");
    assert!(ok);
    assert_eq!(out, "bash\n");
}

fn repositories() -> common::PacmanFixture {
    let pacman_core = desc(&[
        ("FILENAME", &["pacman-6.1.0-3-x86_64.pkg.tar.zst"]),
        ("NAME", &["pacman"]),
        ("VERSION", &["6.1.0-3"]),
        ("CSIZE", &["1536"]),
    ]);
    let pacman_testing = desc(&[("NAME", &["pacman"]), ("VERSION", &["6.2.0-1"])]);
    let yay = desc(&[
        ("NAME", &["yay"]),
        ("VERSION", &["12.3.5-1"]),
        ("DEPENDS", &["pacman>5"]),
    ]);

    PacmanFixtureBuilder::new()
        .with_repo("testing")
        .with_repo("core")
        .with_repo("missing")
        .with_repo("extra")
        .with_sync_db("testing", &[("pacman-6.2.0-1", &pacman_testing)])
        .with_sync_db("core", &[("pacman-6.1.0-3", &pacman_core)])
        .with_sync_db("extra", &[("yay-12.3.5-1", &yay)])
        .build()
}

#[test]
fn sync_targets_search_every_repository() {
    let fixture = repositories();
    let (ok, out) = fixture.query(&["-S", "%r/%n %v", "pacman"]);
    assert!(ok);
    assert_snapshot!(out, @r"
    testing/pacman 6.2.0-1
    core/pacman 6.1.0-3
    ");
}

#[test]
fn readone_stops_at_first_repository() {
    let fixture = repositories();
    let (ok, out) = fixture.query(&["-S", "-1", "%r/%n", "pacman"]);
    assert!(ok);
    assert_eq!(out, "testing/pacman\n");
}

#[test]
fn repository_prefix_selects_one_database() {
    let fixture = repositories();
    let (ok, out) = fixture.query(&["-S", "-H", "auto", "%f %k", "core/pacman"]);
    assert!(ok);
    assert_eq!(out, "pacman-6.1.0-3-x86_64.pkg.tar.zst 1.50 KiB\n");
}

#[test]
fn sync_counter_spans_databases() {
    let fixture = repositories();
    let (ok, out) = fixture.query(&["-S", "%!", ""]);
    assert!(!ok, "an empty target matches nothing");
    assert!(out.is_empty());

    let (ok, out) = fixture.query(&["-S", "-d", " ", "%!"]);
    assert!(ok);
    assert_eq!(out, "0 1 2 ");
}

#[test]
fn install_only_directives_render_question_marks_for_sync() {
    let fixture = repositories();
    let (_, out) = fixture.query(&["-S", "%n %l %w", "extra/yay"]);
    assert_eq!(out, "yay ? ?\n");
}

#[test]
fn package_files_render_file_fields() {
    let fixture = PacmanFixtureBuilder::new().build();
    let archive = fixture.root_path().join("hello-2.12-1-x86_64.pkg.tar.gz");
    std::fs::write(
        &archive,
        tar_gz(&[
            (
                ".PKGINFO".to_string(),
                "pkgname = hello\npkgver = 2.12-1\nlicense = GPL-3.0-or-later\n".to_string(),
            ),
            ("usr/bin/hello".to_string(), "ELF".to_string()),
        ]),
    )
    .unwrap();
    let missing = fixture.root_path().join("absent.pkg.tar.gz");

    let (ok, out) = fixture.query(&[
        "-p",
        "%n %v %f %F %i",
        archive.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]);
    assert!(ok);
    assert_eq!(
        out,
        "hello 2.12-1 hello-2.12-1-x86_64.pkg.tar.gz usr/bin/hello no\n"
    );
}
