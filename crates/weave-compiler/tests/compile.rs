use pretty_assertions::assert_eq;
use serde_json::json;
use weave_compiler::{compile, compile_with_options, CompileError, CompilerOptions};
use weave_dom::Node;

fn html(template: &str, data: serde_json::Value) -> String {
    compile(template, data).unwrap().to_html()
}

#[test]
fn test_text_interpolation() {
    assert_eq!(
        html("<p>Hi {{ a }}, {{ b }} end</p>", json!({ "a": 1, "b": 2 })),
        "<p>Hi 1, 2 end</p>"
    );
}

#[test]
fn test_text_root_node() {
    let compiled = compile(Node::text("Hi {{ a }}"), json!({ "a": 1 })).unwrap();
    assert_eq!(compiled.view, Node::text("Hi 1"));
}

#[test]
fn test_each_expands_in_order() {
    let out = html(r#"<li :each="items">{{ item }}</li>"#, json!({ "items": ["a", "b"] }));
    assert_eq!(out, "<li>a</li><li>b</li>");
    assert!(!out.contains(":each"));
}

#[test]
fn test_each_binds_index() {
    let out = html(
        r#"<ul><li :each="list" data-index="{{ index }}">{{ item.value }}</li></ul>"#,
        json!({ "list": [{ "value": "Hello World." }, { "value": "This is Each." }] }),
    );
    insta::assert_snapshot!(out, @r#"<ul><li data-index="0">Hello World.</li><li data-index="1">This is Each.</li></ul>"#);
}

#[test]
fn test_forin_aliases() {
    let out = html(
        r#"<li :forin="(v, k) in items" data-i="{{ k }}">{{ v }}</li>"#,
        json!({ "items": ["x", "y"] }),
    );
    insta::assert_snapshot!(out, @r#"<li data-i="0">x</li><li data-i="1">y</li>"#);
}

#[test]
fn test_forin_single_alias_keeps_default_index() {
    let out = html(
        r#"<li :forin="row in rows">{{ index }}:{{ row }}</li>"#,
        json!({ "rows": ["a", "b"] }),
    );
    assert_eq!(out, "<li>0:a</li><li>1:b</li>");
}

#[test]
fn test_priority_directive_wins() {
    // `:show` is never bound on the repeated node itself, only on its copies.
    let out = html(
        r#"<li :forin="v in items" :show="a +">{{ v }}</li>"#,
        json!({ "items": [] }),
    );
    assert_eq!(out, "");

    let out = html(
        r#"<li :forin="v in items" :show="v">{{ v }}</li>"#,
        json!({ "items": ["x", ""] }),
    );
    assert_eq!(
        out,
        r#"<li style="display: block;">x</li><li style="display: none;"></li>"#
    );
}

#[test]
fn test_forin_takes_precedence_over_each() {
    // Each copy keeps `:each` and expands it against the copy's own data.
    let out = html(
        r#"<li :each="row" :forin="row in rows">{{ item }}</li>"#,
        json!({ "rows": [["a", "b"], ["c"]] }),
    );
    assert_eq!(out, "<li>a</li><li>b</li><li>c</li>");
}

#[test]
fn test_non_array_leaves_placeholder() {
    let out = html(
        r#"<ul><li :each="count">{{ item }}</li></ul>"#,
        json!({ "count": 3 }),
    );
    assert_eq!(out, "<ul><!--:each--></ul>");

    let out = html(
        r#"<ul><li :forin="v in label">{{ v }}</li></ul>"#,
        json!({ "label": "abc" }),
    );
    assert_eq!(out, "<ul><!--:forin--></ul>");
}

#[test]
fn test_missing_collection_expands_to_nothing() {
    assert_eq!(html(r#"<ul><li :each="missing">x</li></ul>"#, json!({})), "<ul></ul>");
    assert_eq!(
        html(r#"<ul><li :each="none">x</li></ul>"#, json!({ "none": null })),
        "<ul></ul>"
    );
}

#[test]
fn test_nested_each() {
    let out = html(
        r#"<ul><li :each="groups"><b>{{ item.name }}</b><span :each="item.tags">{{ item }}</span></li></ul>"#,
        json!({
            "groups": [
                { "name": "A", "tags": ["x", "y"] },
                { "name": "B", "tags": [] }
            ]
        }),
    );
    insta::assert_snapshot!(out, @"<ul><li><b>A</b><span>x</span><span>y</span></li><li><b>B</b></li></ul>");
}

#[test]
fn test_copies_only_see_loop_bindings() {
    let out = html(
        r#"<li :each="items">{{ item }}-{{ title }}</li>"#,
        json!({ "items": ["a"], "title": "T" }),
    );
    assert_eq!(out, "<li>a-undefined</li>");
}

#[test]
fn test_show_directive() {
    assert_eq!(
        html(r#"<p :show="ok" style="color: red">t</p>"#, json!({ "ok": false })),
        r#"<p style="color: red; display: none;">t</p>"#
    );
    assert_eq!(
        html(r#"<p :show="ok">t</p>"#, json!({ "ok": 1 })),
        r#"<p style="display: block;">t</p>"#
    );
}

#[test]
fn test_text_directive_replaces_children() {
    assert_eq!(
        html(r#"<p :text="msg"><b>{{ broken + }}</b></p>"#, json!({ "msg": "hi" })),
        "<p>hi</p>"
    );
    assert_eq!(html(r#"<p :text="nothing">old</p>"#, json!({})), "<p></p>");
}

#[test]
fn test_attribute_interpolation() {
    assert_eq!(
        html(
            r#"<a href="/u/{{ id }}" title="static">{{ name }}</a>"#,
            json!({ "id": 7, "name": "Ada" })
        ),
        r#"<a href="/u/7" title="static">Ada</a>"#
    );
}

#[test]
fn test_directive_attributes_are_stripped() {
    assert_eq!(html(r#"<p :model="x" :show="">t</p>"#, json!({})), "<p>t</p>");
}

#[test]
fn test_whitespace_text_is_left_alone() {
    let out = html(
        "<ul>\n  <li :each=\"items\">{{ item }}</li>\n</ul>",
        json!({ "items": ["a", "b"] }),
    );
    assert_eq!(out, "<ul>\n  <li>a</li><li>b</li>\n</ul>");
}

#[test]
fn test_expression_syntax_error_surfaces() {
    let err = compile(r#"<p :show="a +">t</p>"#, json!({})).unwrap_err();
    match err {
        CompileError::Parse {
            directive,
            expression,
            ..
        } => {
            assert_eq!(directive, "show");
            assert_eq!(expression, "a +");
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_evaluation_error_surfaces() {
    let err = compile("<p>{{ user.name }}</p>", json!({})).unwrap_err();
    assert_eq!(err.directive(), "text");
    assert_eq!(err.code(), "type-error");
    assert!(matches!(err, CompileError::Eval { .. }));
}

#[test]
fn test_custom_bind_symbol() {
    let options = CompilerOptions::new().with_bind_symbol("w-");
    let compiled = compile_with_options(
        r#"<p w-show="ok" :show="ignored">t</p><i w-each="xs">{{ item }}</i>"#,
        json!({ "ok": true, "xs": [1, 2] }),
        &options,
    )
    .unwrap();
    assert_eq!(
        compiled.to_html(),
        r#"<p :show="ignored" style="display: block;">t</p><i>1</i><i>2</i>"#
    );
}

#[test]
fn test_repeating_directive_outside_priority_list() {
    let options = CompilerOptions::new().with_priority(["each"]);
    let compiled = compile_with_options(
        r#"<li :forin="v in items" title="{{ v }}">{{ v }}</li>"#,
        json!({ "items": ["a"] }),
        &options,
    )
    .unwrap();
    assert_eq!(compiled.to_html(), r#"<li title="a">a</li>"#);
}

#[test]
fn test_recompiles_are_independent() {
    let template = r#"<p :show="on">{{ name }}</p>"#;
    let first = compile(template, json!({ "on": true, "name": "one" })).unwrap();
    let mut second = compile(template, json!({ "on": false, "name": "two" })).unwrap();

    assert_eq!(first.to_html(), r#"<p style="display: block;">one</p>"#);
    assert_eq!(second.to_html(), r#"<p style="display: none;">two</p>"#);

    second.view.set_text_content("changed");
    assert_eq!(first.to_html(), r#"<p style="display: block;">one</p>"#);
}

#[test]
fn test_non_repeating_priority_directive_keeps_compiling_element() {
    let template = r#"<p :show="on" :model="m" :text="msg" title="{{ t }}"><b>{{ a }}</b></p>"#;
    let data = json!({ "on": true, "msg": "hi", "t": "T", "a": "A" });

    let options = CompilerOptions::new().with_priority(["show", "each"]);
    let out = compile_with_options(
        r#"<p :show="on" :model="m" title="{{ t }}"><b>{{ a }}</b></p>"#,
        data.clone(),
        &options,
    )
    .unwrap()
    .to_html();
    assert_eq!(out, r#"<p title="T" style="display: block;"><b>A</b></p>"#);

    let options = CompilerOptions::new().with_priority(["model", "each"]);
    let out = compile_with_options(template, data, &options)
        .unwrap()
        .to_html();
    assert_eq!(out, r#"<p title="T" style="display: block;">hi</p>"#);
    for marker in [":show", ":model", ":text"] {
        assert!(!out.contains(marker), "{} left in {}", marker, out);
    }
}
