use pretty_assertions::assert_eq;
use retag::config::Options;
use retag::selector::SelectError;
use retag::RetagError;

const STRUCT: &str = r#"package foo

type foo struct {
    bar string
    t   bool
}
"#;

fn run(source: &str, opts: Options) -> String {
    let config = opts.build().expect("valid options");
    retag::run(source, &config).expect("rewrite succeeds")
}

fn by_struct(name: &str) -> Options {
    Options {
        struct_name: Some(name.to_string()),
        ..Options::default()
    }
}

fn by_line(line: &str) -> Options {
    Options {
        line: Some(line.to_string()),
        ..Options::default()
    }
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_struct_add() {
    let out = run(
        STRUCT,
        Options {
            add: keys(&["json"]),
            transform: Some("snakecase".into()),
            ..by_struct("foo")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool `json:"t"`
}
"#
    );
}

#[test]
fn test_struct_add_existing() {
    let input = r#"package foo

type foo struct {
    bar string
    t   bool `json:"foo"`
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["json"]),
            ..by_struct("foo")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool `json:"foo"`
}
"#
    );
}

#[test]
fn test_struct_remove() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar" xml:"bar"`
    t   bool   `json:"t"`
}
"#;
    let out = run(
        input,
        Options {
            remove: keys(&["json"]),
            ..by_struct("foo")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `xml:"bar"`
    t   bool
}
"#
    );
}

#[test]
fn test_struct_clear_tags() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar" xml:"bar"`
    t   bool   `json:"t"`
}
"#;
    let out = run(
        input,
        Options {
            clear: true,
            ..by_struct("foo")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string
    t   bool
}
"#
    );
}

#[test]
fn test_struct_clear_options() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar,omitempty" hcl:"bar,squash"`
    t   bool   `json:"t,string"`
}
"#;
    let out = run(
        input,
        Options {
            clear_options: true,
            ..by_struct("foo")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar" hcl:"bar"`
    t   bool   `json:"t"`
}
"#
    );
}

#[test]
fn test_struct_name_miss_is_byte_identical() {
    let out = run(
        STRUCT,
        Options {
            add: keys(&["json"]),
            ..by_struct("DoesNotExist")
        },
    );
    assert_eq!(out, STRUCT);
}

#[test]
fn test_line_add() {
    let out = run(
        STRUCT,
        Options {
            add: keys(&["json"]),
            ..by_line("4")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool
}
"#
    );
}

#[test]
fn test_line_add_with_leading_comment() {
    let input = r#"package foo

type foo struct {
    bar string

    // Timeout is documented
    Timeout int
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["json"]),
            ..by_line("6,7")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string

    // Timeout is documented
    Timeout int `json:"timeout"`
}
"#
    );
}

#[test]
fn test_line_add_option() {
    let input = r#"package foo

type foo struct {
    bar  string `json:"bar"`
    t    bool   `json:"t"`
    qux  int
    quux int    `hcl:"quux"`
}
"#;
    let out = run(
        input,
        Options {
            add_options: keys(&["json=omitempty"]),
            ..by_line("4,7")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar  string `json:"bar,omitempty"`
    t    bool   `json:"t,omitempty"`
    qux  int
    quux int    `hcl:"quux"`
}
"#
    );
}

#[test]
fn test_line_add_option_existing() {
    let input = r#"package foo

type foo struct {
    bar string
    t   bool

    baz string `json:"baz,omitempty"`
    qux bool   `json:"qux,string"`
}
"#;
    let out = run(
        input,
        Options {
            add_options: keys(&["json=omitempty"]),
            ..by_line("6,8")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string
    t   bool

    baz string `json:"baz,omitempty"`
    qux bool   `json:"qux,string,omitempty"`
}
"#
    );
}

#[test]
fn test_line_add_multiple_option() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool   `json:"t"`
    Baz int
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["hcl"]),
            add_options: keys(&["json=omitempty", "hcl=squash"]),
            ..by_line("4,7")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar,omitempty" hcl:"bar,squash"`
    t   bool   `json:"t,omitempty" hcl:"t,squash"`
    Baz int `hcl:"baz,squash"`
}
"#
    );
}

#[test]
fn test_line_remove() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool   `json:"t" xml:"t"`
    baz string `json:"baz"`
    qux string `json:"qux"`
}
"#;
    let out = run(
        input,
        Options {
            remove: keys(&["json"]),
            ..by_line("5,6")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool   `xml:"t"`
    baz string
    qux string `json:"qux"`
}
"#
    );
}

#[test]
fn test_line_remove_options() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar,omitempty" hcl:"bar,omitnested"`
    t   bool   `json:"t,omitempty,string" hcl:"t,squash"`
}
"#;
    let out = run(
        input,
        Options {
            remove_options: keys(&["json=omitempty", "hcl=omitnested"]),
            ..by_line("4,5")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar" hcl:"bar"`
    t   bool   `json:"t,string" hcl:"t,squash"`
}
"#
    );
}

#[test]
fn test_line_camelcase_add() {
    let input = r#"package foo

type foo struct {
    FooBar  string
    UserID  int
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["json"]),
            transform: Some("camelcase".into()),
            ..by_line("4,5")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    FooBar  string `json:"fooBar"`
    UserID  int `json:"userId"`
}
"#
    );
}

#[test]
fn test_line_value_add() {
    let out = run(
        STRUCT,
        Options {
            add: keys(&["json:foo"]),
            transform: Some("pascalcase".into()),
            ..by_line("4,6")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"foo"`
    t   bool `json:"foo"`
}
"#
    );
}

#[test]
fn test_offset_add() {
    let offset = STRUCT.find("string").unwrap();
    let out = run(
        STRUCT,
        Options {
            offset: Some(offset),
            add: keys(&["json"]),
            ..Options::default()
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool
}
"#
    );
}

#[test]
fn test_offset_add_in_duplicate_struct() {
    let input = r#"package foo

type foo struct {
    bar string
}

type foo struct {
    qux string
}
"#;
    let offset = input.find("qux").unwrap();
    let out = run(
        input,
        Options {
            offset: Some(offset),
            add: keys(&["json"]),
            ..Options::default()
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string
}

type foo struct {
    qux string `json:"qux"`
}
"#
    );
}

#[test]
fn test_offset_miss_is_fatal() {
    let config = Options {
        offset: Some(STRUCT.find("type").unwrap()),
        add: keys(&["json"]),
        ..Options::default()
    }
    .build()
    .unwrap();

    assert!(matches!(
        retag::run(STRUCT, &config),
        Err(RetagError::Select(SelectError::OffsetNotFound(_)))
    ));
}

#[test]
fn test_syntax_error_is_fatal() {
    let config = Options {
        add: keys(&["json"]),
        ..by_struct("foo")
    }
    .build()
    .unwrap();

    let broken = "package foo\n\ntype foo struct {\n    bar string\n";
    assert!(matches!(
        retag::run(broken, &config),
        Err(RetagError::Parse(_))
    ));
}

#[test]
fn test_embedded_and_nested_fields() {
    let input = r#"package foo

type Server struct {
    *http.Client
    Config struct {
        MaxConns int
    }
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["yaml"]),
            transform: Some("lispcase".into()),
            ..by_struct("Server")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type Server struct {
    *http.Client `yaml:"client"`
    Config struct {
        MaxConns int `yaml:"max-conns"`
    } `yaml:"config"`
}
"#
    );
}

#[test]
fn test_json_output() {
    let input = r#"package foo

type foo struct {
    FooBar string `json:"old,omitempty"`
    UserName int
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["xml"]),
            transform: Some("camelcase".into()),
            format: Some("json".into()),
            ..by_line("4,5")
        },
    );

    let records: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        records,
        serde_json::json!([
            {
                "struct": "foo",
                "field": "FooBar",
                "line": 4,
                "before": "json:\"old,omitempty\"",
                "tag": "json:\"old,omitempty\" xml:\"fooBar\"",
                "options": ["json=omitempty"]
            },
            {
                "struct": "foo",
                "field": "UserName",
                "line": 5,
                "before": "",
                "tag": "xml:\"userName\"",
                "options": []
            }
        ])
    );
}

#[test]
fn test_json_output_lists_changed_fields_only() {
    let input = r#"package foo

type foo struct {
    Bar string `json:"bar"`
    Baz int
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["json"]),
            format: Some("json".into()),
            ..by_struct("foo")
        },
    );

    let records: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(records.as_array().map(Vec::len), Some(1));
    assert_eq!(records[0]["field"], "Baz");
    assert_eq!(records[0]["tag"], "json:\"baz\"");
}

#[test]
fn test_line_literal_add_keeps_existing_name() {
    let input = r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool
}
"#;
    let out = run(
        input,
        Options {
            add: keys(&["json:foo"]),
            ..by_line("4,5")
        },
    );

    assert_eq!(
        out,
        r#"package foo

type foo struct {
    bar string `json:"bar"`
    t   bool `json:"foo"`
}
"#
    );
}

#[test]
fn test_json_output_for_empty_selection() {
    let out = run(
        STRUCT,
        Options {
            add: keys(&["json"]),
            format: Some("json".into()),
            ..by_struct("missing")
        },
    );
    assert_eq!(out, "[]");
}
