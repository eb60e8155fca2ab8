use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn apparel() -> Command {
    let mut cmd = Command::cargo_bin("apparel").expect("apparel binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

#[test]
fn renders_to_stdout_verbatim() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "data.json", r#"{"name": "Alice"}"#);
    let tpl = fixture(&dir, "tpl.hbs", "Hello, {{name}}!");

    apparel()
        .arg(&src)
        .arg(&tpl)
        .assert()
        .success()
        .stdout("Hello, Alice!")
        .stderr(predicate::str::contains(format!("Loading config from: {src}")))
        .stderr(predicate::str::contains(format!("Loading template from: {tpl}")))
        .stderr(predicate::str::contains("Rendering template..."));
}

#[test]
fn missing_config_exits_with_io_error() {
    let dir = TempDir::new().unwrap();
    let tpl = fixture(&dir, "tpl.hbs", "Hello, {{name}}!");
    let missing = dir.path().join("absent.json");

    apparel()
        .arg(&missing)
        .arg(&tpl)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error: I/O error"))
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn writes_destination_exactly_and_confirms_on_stderr() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "data.yml", "name: Alice\nitems:\n  - one\n  - two\n");
    let tpl = fixture(
        &dir,
        "page.ejs",
        "<h1><%= name %></h1>\n<% for item in items { -%>\n<li><%= item %></li>\n<% } -%>\n",
    );
    let dst = dir.path().join("page.html");

    apparel()
        .arg(&src)
        .arg(&tpl)
        .arg(&dst)
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains(format!(
            "Output written to: {}",
            dst.display()
        )));

    assert_eq!(
        std::fs::read_to_string(&dst).unwrap(),
        "<h1>Alice</h1>\n<li>one</li>\n<li>two</li>\n"
    );
}

#[test]
fn overwrites_existing_destination() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "data.toml", "count = 2\n");
    let tpl = fixture(&dir, "out.liquid", "{{ count | plus: 1 }}");
    let dst = dir.path().join("out.txt");
    std::fs::write(&dst, "stale content\n").unwrap();

    apparel().arg(&src).arg(&tpl).arg(&dst).assert().success();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "3");
}

#[test]
fn parse_failure_is_reported_with_prefix() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "broken.json", "{\"name\": ");
    let tpl = fixture(&dir, "tpl.hbs", "{{name}}");

    apparel()
        .arg(&src)
        .arg(&tpl)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error: failed to parse config file"));
}

#[test]
fn render_failure_is_reported_with_template_path() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "data.json", "{}");
    let tpl = fixture(&dir, "tpl.j2", "{% for %}");

    apparel()
        .arg(&src)
        .arg(&tpl)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error: failed to render template"))
        .stderr(predicate::str::contains("tpl.j2"));
}

#[test]
fn xml_config_feeds_attributes_to_template() {
    let dir = TempDir::new().unwrap();
    let src = fixture(
        &dir,
        "server.xml",
        r#"<server port="8080" secure="true"><name>api</name></server>"#,
    );
    let tpl = fixture(
        &dir,
        "conf.hbs",
        "{{server.name}}:{{lookup server \"@_port\"}}:{{add (lookup server \"@_port\") 1}}",
    );

    apparel()
        .arg(&src)
        .arg(&tpl)
        .assert()
        .success()
        .stdout("api:8080:8081");
}

#[test]
fn missing_arguments_exit_with_status_one() {
    apparel()
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_flag_exits_with_status_one() {
    apparel()
        .args(["--bogus", "a.json", "b.hbs"])
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn help_flag_succeeds() {
    apparel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fill templates with variables from config files"));
}

#[test]
fn version_flag_reports_crate_version() {
    apparel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn optional_variables_render_empty_in_every_engine() {
    let dir = TempDir::new().unwrap();
    let src = fixture(&dir, "data.json", r#"{"name": "Alice"}"#);

    for (name, template) in [
        ("opt.hbs", "{{name}}[{{nick}}]"),
        ("opt.liquid", "{{ name }}[{{ nick }}]"),
        ("opt.j2", "{{ name }}[{{ nick }}]"),
    ] {
        let tpl = fixture(&dir, name, template);
        apparel().arg(&src).arg(&tpl).assert().success().stdout("Alice[]");
    }
}
