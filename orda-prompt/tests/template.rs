use orda_core::Value;
use orda_prompt::{vars, PromptTemplate};

#[test]
fn renders_template_with_vars() {
    let tmpl = PromptTemplate::new("Hello {{ name }}");
    let rendered = tmpl.render(&vars([("name", "Orda")])).expect("render");
    assert_eq!(rendered, "Hello Orda");
}

#[test]
fn does_not_confuse_overlapping_keys() {
    let tmpl = PromptTemplate::new("{{name}} {{fullname}}");
    let rendered = tmpl
        .render(&vars([("name", "X"), ("fullname", "Y")]))
        .expect("render");
    assert_eq!(rendered, "X Y");
}

#[test]
fn renders_numbers_and_drops_missing_vars() {
    let tmpl = PromptTemplate::new("{{count}}개 [{{missing}}]");
    let rendered = tmpl
        .render(&vars([("count", Value::from(3))]))
        .expect("render");
    assert_eq!(rendered, "3개 []");
}

#[test]
fn lists_input_variables_once() {
    let tmpl = PromptTemplate::new("{{a}} {{b}} {{a}}");
    assert_eq!(tmpl.input_variables(), vec!["a".to_string(), "b".to_string()]);
}
