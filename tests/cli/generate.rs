use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const LOGIN: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:h="http://java.sun.com/jsf/html">
  <body>
    <div>Sign in</div>
  </body>
</html>
"#;

const LOGIN_REWRITTEN: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:h="http://java.sun.com/jsf/html">
    <body>
        <div>#{messages.login_TEXT_Sign_in}</div>
    </body>
</html>
"#;

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_extracts_text_into_bundle() -> Result<()> {
    let test = CliTest::with_file("web/login.xhtml", LOGIN)?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_snapshot!(stdout(&output), @r"
    Templates: web
    Resources: res
    Encoding: ISO-8859-1

    login.xhtml (1 new message(s) found)
    Saving messages_en.properties

    ✓ Extracted 1 message(s) from 1 template, saved 1 bundle
    ");

    assert_eq!(test.read_file("web/login.xhtml")?, LOGIN_REWRITTEN);

    let bundle = test.read_file("res/messages_en.properties")?;
    assert!(bundle.starts_with(
        "#########################################################################\r\n# Generated on "
    ));
    assert!(bundle.contains("\r\n# login\r\nlogin_TEXT_Sign_in=Sign in\r\n"));
    assert!(bundle.contains("\r\n# date\r\ndate_time_format=yyyy-MM-dd HH:mm:ss z\r\n"));
    assert!(bundle.contains("# There are no old but used properties\r\n"));
    assert!(bundle.ends_with("# There are no old and not used properties\r\n"));

    Ok(())
}

#[test]
fn test_all_locales_are_updated() -> Result<()> {
    let test = CliTest::with_file("web/login.xhtml", LOGIN)?;
    test.write_file(
        "res/messages_de.properties",
        "login_TEXT_Sign_in=Anmelden\nunused=Alt\ndate_time_format=dd.MM.yyyy\n",
    )?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let de = test.read_file("res/messages_de.properties")?;
    assert!(de.contains(
        "# Comments: \r\n# Property: \"login_TEXT_Sign_in\" already exist with value: \"Anmelden\", the new value would have been: \"Sign in\"\r\n\r\n"
    ));
    assert!(de.contains("# OLD but USED properties\r\n"));
    assert!(de.contains("login_TEXT_Sign_in=Sign in\r\n"));
    assert!(de.contains("# There are no new properties\r\n"));
    assert!(de.contains("unused=Alt\r\n"));
    assert!(de.contains("date_time_format=dd.MM.yyyy\r\n"));

    let en = test.read_file("res/messages_en.properties")?;
    assert!(en.contains("login_TEXT_Sign_in=Sign in\r\n"));
    assert!(!en.contains("Comments"));

    let out = stdout(&output);
    let de_pos = out.find("Saving messages_de.properties").unwrap();
    let en_pos = out.find("Saving messages_en.properties").unwrap();
    assert!(de_pos < en_pos);

    Ok(())
}

#[test]
fn test_value_attributes_and_patterns() -> Result<()> {
    let test = CliTest::with_file(
        "web/user/edit.xhtml",
        r##"<h:form xmlns:h="http://java.sun.com/jsf/html" xmlns:f="http://java.sun.com/jsf/core">
<h:commandButton value="Save changes"/>
<h:outputText value="#{user.birthday}"><f:convertDateTime pattern="dd.MM.yyyy"/></h:outputText>
<h:graphicImage value="logo.png"/>
</h:form>"##,
    )?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("edit.xhtml (1 new message(s) found)"));

    let template = test.read_file("web/user/edit.xhtml")?;
    assert!(template.contains(r##"<h:commandButton value="#{messages.edit_commandButton_Save_changes}"/>"##));
    assert!(template.contains(r##"<f:convertDateTime pattern="#{messages.date_time_format}"/>"##));
    assert!(template.contains(r#"<h:graphicImage value="logo.png"/>"#));

    let bundle = test.read_file("res/messages_en.properties")?;
    assert!(bundle.contains("edit_commandButton_Save_changes=Save changes\r\n"));

    Ok(())
}

#[test]
fn test_no_bundles_is_fatal_and_touches_nothing() -> Result<()> {
    let test = CliTest::with_file("web/login.xhtml", LOGIN)?;
    test.write_file("res/readme.txt", "nothing here")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("No messages_xx.properties files found at res"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(test.read_file("web/login.xhtml")?, LOGIN);

    Ok(())
}

#[test]
fn test_missing_arguments_print_usage() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("web").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage:"));
    assert!(stdout(&output).is_empty());

    Ok(())
}

#[test]
fn test_malformed_template_aborts_run() -> Result<()> {
    let test = CliTest::with_file("web/a.xhtml", "<p>Alpha</p>")?;
    test.write_file("web/b.xhtml", "<p>Beta</div>")?;
    test.write_file("res/messages_en.properties", "old=1\n")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse"));
    assert_eq!(test.read_file("res/messages_en.properties")?, "old=1\n");
    assert!(!stdout(&output).contains("Saving"));

    Ok(())
}

#[test]
fn test_keep_going_skips_broken_template() -> Result<()> {
    let test = CliTest::with_file("web/a.xhtml", "<p>Alpha</p>")?;
    test.write_file("web/b.xhtml", "<p>Beta</div>")?;
    test.write_file("web/c.xhtml", "<p>Gamma</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().arg("--keep-going").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("skipped b.xhtml"));
    assert!(stdout(&output).contains("1 template(s) skipped"));

    let bundle = test.read_file("res/messages_en.properties")?;
    assert!(bundle.contains("a_TEXT_Alpha=Alpha"));
    assert!(bundle.contains("c_TEXT_Gamma=Gamma"));
    assert!(!bundle.contains("Beta"));
    assert_eq!(test.read_file("web/b.xhtml")?, "<p>Beta</div>");

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("web/login.xhtml", LOGIN)?;
    test.write_file("res/messages_en.properties", "a=1\n")?;

    let output = test.generate_command().arg("--dry-run").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("login.xhtml (1 new message(s) found)"));
    assert!(stdout(&output).contains("checked 1 bundle"));
    assert!(stdout(&output).contains("Would save messages_en.properties"));
    assert!(!stdout(&output).contains("Saving"));
    assert_eq!(test.read_file("web/login.xhtml")?, LOGIN);
    assert_eq!(test.read_file("res/messages_en.properties")?, "a=1\n");

    Ok(())
}

#[test]
fn test_second_run_finds_nothing_new() -> Result<()> {
    let test = CliTest::with_file("web/login.xhtml", LOGIN)?;
    test.write_file("res/messages_en.properties", "")?;

    let first = test.generate_command().output()?;
    assert_eq!(first.status.code(), Some(0));
    let template = test.read_file("web/login.xhtml")?;

    let second = test.generate_command().output()?;
    assert_eq!(second.status.code(), Some(0));

    assert!(stdout(&second).contains("login.xhtml (0 new message(s) found)"));
    assert_eq!(test.read_file("web/login.xhtml")?, template);

    let bundle = test.read_file("res/messages_en.properties")?;
    assert!(bundle.contains("# There are no old but used properties\r\n"));
    assert!(bundle.contains("# There are no new properties\r\n"));
    assert!(bundle.contains("login_TEXT_Sign_in=Sign in\r\n"));

    Ok(())
}

#[test]
fn test_latin1_templates_and_entities() -> Result<()> {
    let test = CliTest::new()?;
    test.write_bytes(
        "web/home.xhtml",
        b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"xhtml1-transitional.dtd\">\n<div><p>Gr\xfc\xdfe</p><p>&copy; 2024</p></div>",
    )?;
    test.write_file("res/messages_de.properties", "")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let template = test.read_bytes("web/home.xhtml")?;
    let expected: &[u8] = b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"xhtml1-transitional.dtd\">\n<div>\n    <p>#{messages.home_TEXT_Gr\xfc\xdfe}</p>\n    <p>\xa9 2024</p>\n</div>\n";
    assert_eq!(template, expected);

    let bundle = test.read_file("res/messages_de.properties")?;
    assert!(bundle.contains("home_TEXT_Gr\\u00FC\\u00DFe=Gr\\u00FC\\u00DFe\r\n"));

    Ok(())
}

#[test]
fn test_utf8_encoding_argument() -> Result<()> {
    let test = CliTest::with_file("web/home.xhtml", "<p>Caf\u{e9} \u{2192} bar</p>")?;
    test.write_file("res/messages_fr.properties", "")?;

    let output = test.generate_command().arg("UTF-8").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Encoding: UTF-8"));

    assert_eq!(
        test.read_file("web/home.xhtml")?,
        "<p>#{messages.home_TEXT_Caf\u{e9}_bar}</p>\n"
    );
    let bundle = test.read_file("res/messages_fr.properties")?;
    assert!(bundle.contains("home_TEXT_Caf\\u00E9_bar=Caf\\u00E9 \\u2192 bar\r\n"));

    Ok(())
}

#[test]
fn test_unknown_encoding_argument_fails() -> Result<()> {
    let test = CliTest::with_file("web/home.xhtml", "<p>Hi</p>")?;
    test.write_file("res/messages_en.properties", "")?;

    let output = test.generate_command().arg("klingon").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Unknown character encoding: 'klingon'"));
    assert_eq!(test.read_file("web/home.xhtml")?, "<p>Hi</p>");

    Ok(())
}

#[test]
fn test_malformed_bundle_is_fatal() -> Result<()> {
    let test = CliTest::with_file("web/home.xhtml", "<p>Hi</p>")?;
    test.write_file("res/messages_en.properties", "bad=\\uZZZZ\n")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Malformed property file"));
    assert_eq!(test.read_file("web/home.xhtml")?, "<p>Hi</p>");

    Ok(())
}
