use assert_cmd::Command;

fn libris() -> Command {
    Command::cargo_bin("libris").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    let output = libris().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "migrate", "routes"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn test_routes_prints_every_endpoint_offline() {
    let output = libris()
        .arg("routes")
        .env("LIBRIS_ENV", "local")
        .env("LIBRIS_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env("LIBRIS_SERVER__API_PREFIX", "/api")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("GET    /healthz"));
    for collection in ["books", "authors", "publishers", "categories", "reviews", "users", "borrowings"] {
        assert!(stdout.contains(&format!("POST   /api/{collection}")), "{collection}");
        assert!(stdout.contains(&format!("DELETE /api/{collection}/{{id}}")), "{collection}");
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    libris().arg("shelve").assert().failure();
}
