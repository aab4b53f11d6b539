use sprig_core::Source;
use sprig_html::{TemplateError, Value, html};

#[test]
fn if_with_else_keeps_branches_complementary() -> Result<(), TemplateError> {
    let shown = Source::new(Value::Bool(true));
    let rendered = html!(
        r#"<div><span if=""# (shown.clone()) r#"">yes</span><span else>no</span></div>"#
    )?;
    let div = rendered.node().unwrap();
    let primary = div.children()[0].clone();

    assert_eq!(rendered.to_html(), r#"<div><span>yes</span><!----></div>"#);

    shown.set(Value::Bool(false));
    assert_eq!(rendered.to_html(), r#"<div><!----><span else="">no</span></div>"#);

    // restoring brings back the very same element, not a clone
    shown.set(Value::Bool(true));
    assert_eq!(div.children()[0], primary);
    assert_eq!(rendered.to_html(), r#"<div><span>yes</span><!----></div>"#);
    Ok(())
}

#[test]
fn repeated_toggles_stay_consistent() -> Result<(), TemplateError> {
    let shown = Source::new(Value::Bool(false));
    let rendered = html!(
        r#"<div><b if=""# (shown.clone()) r#"">on</b><i else>off</i></div>"#
    )?;

    assert_eq!(rendered.to_html(), r#"<div><!----><i else="">off</i></div>"#);
    for _ in 0..3 {
        shown.set(Value::Bool(true));
        assert_eq!(rendered.to_html(), r#"<div><b>on</b><!----></div>"#);
        shown.set(Value::Bool(false));
        assert_eq!(rendered.to_html(), r#"<div><!----><i else="">off</i></div>"#);
    }
    Ok(())
}

#[test]
fn if_not_negates_the_source() -> Result<(), TemplateError> {
    let hidden = Source::new(Value::Bool(true));
    let rendered = html!(r#"<div><p if-not=""# (hidden.clone()) r#"">off</p></div>"#)?;

    assert_eq!(rendered.to_html(), "<div><!----></div>");

    hidden.set(Value::Bool(false));
    assert_eq!(rendered.to_html(), "<div><p>off</p></div>");
    Ok(())
}

#[test]
fn scalar_condition_resolves_once() -> Result<(), TemplateError> {
    let rendered = html!(r#"<div><p if=""# (false) r#"">never</p></div>"#)?;
    assert_eq!(rendered.to_html(), "<div><!----></div>");

    let rendered = html!(r#"<div><p if=""# (true) r#"">always</p></div>"#)?;
    assert_eq!(rendered.to_html(), "<div><p>always</p></div>");
    Ok(())
}

#[test]
fn derived_condition_is_reactive() -> Result<(), TemplateError> {
    let count = Source::new(Value::Int(0));
    let nonzero = {
        let count = count.clone();
        Value::func(move || Value::Bool(count.get().as_int().unwrap_or(0) != 0))
    };
    let rendered = html!(r#"<div><em if=""# (nonzero) r#"">some</em></div>"#)?;

    assert_eq!(rendered.to_html(), "<div><!----></div>");
    count.set(Value::Int(3));
    assert_eq!(rendered.to_html(), "<div><em>some</em></div>");
    Ok(())
}

#[test]
fn defer_slot_wrapper_is_unwrapped() -> Result<(), TemplateError> {
    let shown = Source::new(Value::Bool(false));
    let rendered = html!(
        r#"<div><defer-slot if=""# (shown.clone()) r#""><b>inner</b></defer-slot></div>"#
    )?;

    // the wrapper never reaches the output tree
    assert_eq!(rendered.to_html(), "<div><!----></div>");

    shown.set(Value::Bool(true));
    assert_eq!(rendered.to_html(), "<div><b>inner</b></div>");
    Ok(())
}

#[test]
fn defer_slot_resolves_after_sibling_bindings() -> Result<(), TemplateError> {
    // The conditional's subtree carries its own binding; deferral means the
    // inner content is bound by the time the wrapper is unwrapped.
    let label = Source::new(Value::from("inner"));
    let shown = Source::new(Value::Bool(true));
    let rendered = html!(
        r#"<div><defer-slot if=""# (shown.clone()) r#""><b>"# (label.clone()) r#"</b></defer-slot></div>"#
    )?;

    assert_eq!(rendered.to_html(), "<div><b>inner</b></div>");

    label.set(Value::from("updated"));
    assert_eq!(rendered.to_html(), "<div><b>updated</b></div>");

    shown.set(Value::Bool(false));
    assert_eq!(rendered.to_html(), "<div><!----></div>");
    Ok(())
}
