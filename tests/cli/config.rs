use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_keep_going_from_config() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", r#"{ "keepGoing": true }"#)?;
    test.write_file("web/a.xhtml", "<p>Alpha</p>")?;
    test.write_file("web/b.xhtml", "<p>Beta</div>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("skipped b.xhtml"));
    assert!(test.read_file("res/messages_en.properties")?.contains("a_TEXT_Alpha=Alpha"));

    Ok(())
}

#[test]
fn test_ignores_from_config() -> Result<()> {
    let test = CliTest::with_file(
        ".i18ngenrc.json",
        r#"{ "ignores": ["layout", "**/draft_*.xhtml"] }"#,
    )?;
    test.write_file("web/home.xhtml", "<p>Home</p>")?;
    test.write_file("web/layout/frame.xhtml", "<p>Frame</p>")?;
    test.write_file("web/draft_news.xhtml", "<p>News</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("home.xhtml (1 new message(s) found)"));
    assert!(!out.contains("frame.xhtml"));
    assert!(!out.contains("draft_news.xhtml"));

    assert_eq!(test.read_file("web/layout/frame.xhtml")?, "<p>Frame</p>");
    assert_eq!(test.read_file("web/draft_news.xhtml")?, "<p>News</p>");

    Ok(())
}

#[test]
fn test_template_extension_from_config() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", r#"{ "templateExtension": "jspx" }"#)?;
    test.write_file("web/home.jspx", "<p>Home</p>")?;
    test.write_file("web/other.xhtml", "<p>Other</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("web/home.jspx")?,
        "<p>#{messages.home_TEXT_Home}</p>\n"
    );
    assert_eq!(test.read_file("web/other.xhtml")?, "<p>Other</p>");

    Ok(())
}

#[test]
fn test_encoding_argument_overrides_config() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", r#"{ "encoding": "UTF-8" }"#)?;
    test.write_file("web/home.xhtml", "<p>Home</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let from_config = test.generate_command().arg("--dry-run").output()?;
    assert!(stdout(&from_config).contains("Encoding: UTF-8"));

    let overridden = test
        .generate_command()
        .arg("ISO-8859-1")
        .arg("--dry-run")
        .output()?;
    assert!(stdout(&overridden).contains("Encoding: ISO-8859-1"));

    Ok(())
}

#[test]
fn test_config_found_in_parent_directory() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", r#"{ "keepGoing": true }"#)?;
    test.write_file("site/web/a.xhtml", "<p>Beta</div>")?;
    test.write_file("site/res/messages_en.properties", "")?;

    let output = test
        .command()
        .current_dir(test.root().join("site"))
        .arg("web")
        .arg("res")
        .output()?;

    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_malformed_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", "{ not json")?;
    test.write_file("web/home.xhtml", "<p>Home</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse config file"));
    assert_eq!(test.read_file("web/home.xhtml")?, "<p>Home</p>");

    Ok(())
}

#[test]
fn test_unknown_encoding_in_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file(".i18ngenrc.json", r#"{ "encoding": "klingon" }"#)?;
    test.write_file("web/home.xhtml", "<p>Home</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid 'encoding': \"klingon\""));

    Ok(())
}
