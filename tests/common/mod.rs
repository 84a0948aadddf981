// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed pacman layout (config file, local
// database, sync databases and package archives) and a fluent builder so
// each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io::{Cursor, Write as _};
use std::path::{Path, PathBuf};

use clap::Parser as _;
use flate2::Compression;
use flate2::write::GzEncoder;

use pkgfmt::cli::Cli;
use pkgfmt::commands::query;

/// Build a gzip-compressed tar archive from `(path, contents)` pairs.
pub fn tar_gz(entries: &[(String, String)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, path, data.as_bytes())
            .expect("append tar entry");
    }
    let tar = builder.into_inner().expect("finish tar");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).expect("gzip tar");
    encoder.finish().expect("finish gzip")
}

/// Render a pacman `desc` file from `(KEY, values)` blocks.
pub fn desc(blocks: &[(&str, &[&str])]) -> String {
    blocks
        .iter()
        .map(|(key, values)| format!("%{key}%\n{}\n", values.join("\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An isolated pacman layout backed by a [`tempfile::TempDir`].
pub struct PacmanFixture {
    /// Temporary directory holding the whole layout.
    pub root: tempfile::TempDir,
}

impl PacmanFixture {
    /// The filesystem root installed packages live under.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// The database directory.
    pub fn db_path(&self) -> PathBuf {
        self.root.path().join("var/lib/pacman")
    }

    /// The main configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("etc/pacman.conf")
    }

    /// Run a query with `args` (after the program name and config flag) and
    /// return the success flag and stdout.
    pub fn query(&self, args: &[&str]) -> (bool, String) {
        self.query_with_stdin(args, "")
    }

    /// Like [`Self::query`] with `stdin` available for `-` targets.
    pub fn query_with_stdin(&self, args: &[&str], stdin: &str) -> (bool, String) {
        let config = self.config_path();
        let mut argv = vec!["pkgfmt", "-c", config.to_str().expect("utf-8 path")];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);

        let mut out = Vec::new();
        let ok = query::execute(&cli, Cursor::new(stdin.to_string()), &mut out)
            .expect("query should succeed");
        (ok, String::from_utf8(out).expect("utf-8 output"))
    }
}

/// Fluent builder for [`PacmanFixture`].
#[derive(Default)]
pub struct PacmanFixtureBuilder {
    config: Option<String>,
    repos: Vec<String>,
    local: Vec<(String, String, Option<String>)>,
    sync: Vec<(String, Vec<(String, String)>)>,
    files: Vec<(String, String)>,
}

impl PacmanFixtureBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `content` verbatim as `etc/pacman.conf`. `{root}` is replaced by
    /// the fixture root.
    pub fn with_config(mut self, content: &str) -> Self {
        self.config = Some(content.to_string());
        self
    }

    /// Add a `[repo]` section to the generated configuration.
    pub fn with_repo(mut self, repo: &str) -> Self {
        self.repos.push(repo.to_string());
        self
    }

    /// Add an installed package with a `desc` file and optional `files` file.
    pub fn with_installed(mut self, dir_name: &str, desc: &str, files: Option<&str>) -> Self {
        self.local
            .push((dir_name.to_string(), desc.to_string(), files.map(str::to_string)));
        self
    }

    /// Add a sync database for `repo` with `(entry dir, desc)` pairs.
    pub fn with_sync_db(mut self, repo: &str, entries: &[(&str, &str)]) -> Self {
        let entries = entries
            .iter()
            .map(|(dir, desc)| (format!("{dir}/desc"), (*desc).to_string()))
            .collect();
        self.sync.push((repo.to_string(), entries));
        self
    }

    /// Write an extra file relative to the fixture root.
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    /// Materialise the layout on disk.
    pub fn build(self) -> PacmanFixture {
        let fixture = PacmanFixture {
            root: tempfile::tempdir().expect("create temp dir"),
        };
        let root = fixture.root_path().to_path_buf();
        let db = fixture.db_path();

        std::fs::create_dir_all(db.join("local")).expect("create local db");
        std::fs::create_dir_all(db.join("sync")).expect("create sync dir");
        std::fs::create_dir_all(root.join("etc")).expect("create etc");

        let config = self.config.unwrap_or_else(|| {
            let mut config = String::from("[options]\nRootDir = {root}\nDBPath = {root}/var/lib/pacman\n");
            for repo in &self.repos {
                config.push_str(&format!("\n[{repo}]\nServer = https://example.org/$repo\n"));
            }
            config
        });
        std::fs::write(
            fixture.config_path(),
            config.replace("{root}", &root.display().to_string()),
        )
        .expect("write pacman.conf");

        for (dir_name, desc, files) in &self.local {
            let entry = db.join("local").join(dir_name);
            std::fs::create_dir_all(&entry).expect("create local entry");
            std::fs::write(entry.join("desc"), desc).expect("write desc");
            if let Some(files) = files {
                std::fs::write(entry.join("files"), files).expect("write files");
            }
        }

        for (repo, entries) in &self.sync {
            std::fs::write(db.join("sync").join(format!("{repo}.db")), tar_gz(entries))
                .expect("write sync db");
        }

        for (relative, content) in &self.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dir");
            }
            std::fs::write(path, content.replace("{root}", &root.display().to_string()))
                .expect("write file");
        }

        fixture
    }
}
