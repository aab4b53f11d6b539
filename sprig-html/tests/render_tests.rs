use sprig_core::Source;
use sprig_dom::NodeRef;
use sprig_html::{Rendered, TemplateError, Value, html};

#[test]
fn static_template_equals_parsing_the_markup() -> Result<(), TemplateError> {
    let rendered = html!("<div><span>hi</span></div>")?;
    assert_eq!(rendered.to_html(), "<div><span>hi</span></div>");
    assert_eq!(
        rendered.to_html(),
        sprig_dom::to_html(&sprig_dom::parse("<div><span>hi</span></div>"))
    );
    Ok(())
}

#[test]
fn outer_whitespace_is_trimmed() -> Result<(), TemplateError> {
    let rendered = html!("\n    <div>x</div>   \n")?;
    assert_eq!(rendered.nodes().len(), 1);
    assert_eq!(rendered.to_html(), "<div>x</div>");
    Ok(())
}

#[test]
fn multiple_roots_come_back_in_order() -> Result<(), TemplateError> {
    let rendered = html!("<div>a</div>  <div>b</div>")?;
    assert_eq!(rendered.nodes().len(), 2);
    assert!(rendered.node().is_none());
    assert_eq!(rendered.to_html(), "<div>a</div><div>b</div>");
    Ok(())
}

#[test]
fn scalar_content_renders_its_string_form() -> Result<(), TemplateError> {
    let rendered = html!("<p>" ("hello") "</p>")?;
    assert_eq!(rendered.to_html(), "<p>hello</p>");

    let rendered = html!("<p>" (42) "</p>")?;
    assert_eq!(rendered.to_html(), "<p>42</p>");

    let rendered = html!("<p>" (true) "</p>")?;
    assert_eq!(rendered.to_html(), "<p>true</p>");
    Ok(())
}

#[test]
fn string_scalars_may_carry_markup() -> Result<(), TemplateError> {
    let rendered = html!("<div>" ("<span>inner</span>") "</div>")?;
    assert_eq!(rendered.to_html(), "<div><span>inner</span></div>");
    Ok(())
}

#[test]
fn node_interpolation_keeps_identity() -> Result<(), TemplateError> {
    let em = NodeRef::element("em");
    em.append_child(NodeRef::text("now"));

    let rendered = html!("<div>" (em.clone()) "</div>")?;
    assert_eq!(rendered.nodes()[0].children()[0], em);
    Ok(())
}

#[test]
fn reactive_text_updates_without_touching_siblings() -> Result<(), TemplateError> {
    let count = Source::new(Value::Int(0));
    let rendered = html!("<p><b>Count:</b> " (count.clone()) "</p>")?;
    assert_eq!(rendered.to_html(), "<p><b>Count:</b> 0</p>");

    let bold = rendered.nodes()[0].children()[0].clone();
    count.set(Value::Int(7));
    assert_eq!(rendered.to_html(), "<p><b>Count:</b> 7</p>");
    // the sibling element is untouched, not re-created
    assert_eq!(rendered.nodes()[0].children()[0], bold);
    Ok(())
}

#[test]
fn emission_sequence_leaves_only_the_last_value() -> Result<(), TemplateError> {
    let source = Source::new(Value::from("a"));
    let rendered = html!("<p>" (source.clone()) "</p>")?;

    source.set(Value::from("b"));
    source.set(Value::from("c"));

    assert_eq!(rendered.to_html(), "<p>c</p>");
    // exactly the node set for "c", no leaked prior nodes
    assert_eq!(rendered.nodes()[0].children().len(), 1);
    Ok(())
}

#[test]
fn absent_values_render_a_comment_anchor() -> Result<(), TemplateError> {
    let source = Source::new(Value::Null);
    let rendered = html!("<div>" (source.clone()) "</div>")?;
    assert_eq!(rendered.to_html(), "<div><!----></div>");

    // every absent shape keeps the single comment anchor
    source.set(Value::from(""));
    assert_eq!(rendered.to_html(), "<div><!----></div>");
    source.set(Value::List(vec![]));
    assert_eq!(rendered.to_html(), "<div><!----></div>");

    // and the anchor is replaced once a value arrives
    source.set(Value::from("x"));
    assert_eq!(rendered.to_html(), "<div>x</div>");
    source.set(Value::Null);
    assert_eq!(rendered.to_html(), "<div><!----></div>");
    Ok(())
}

#[test]
fn derived_function_becomes_reactive() -> Result<(), TemplateError> {
    let count = Source::new(Value::Int(1));
    let label = {
        let count = count.clone();
        Value::func(move || Value::Str(format!("n={}", count.get().as_int().unwrap_or(0))))
    };
    let rendered = html!("<p>" (label) "</p>")?;
    assert_eq!(rendered.to_html(), "<p>n=1</p>");

    count.set(Value::Int(5));
    assert_eq!(rendered.to_html(), "<p>n=5</p>");
    Ok(())
}

#[test]
fn list_renders_every_item_in_order() -> Result<(), TemplateError> {
    let items = Source::new(Value::List(vec![
        Value::from("<li>a</li>"),
        Value::from("<li>b</li>"),
        Value::from("<li>c</li>"),
    ]));
    let rendered = html!("<ul>" (items.clone()) "</ul>")?;
    assert_eq!(rendered.to_html(), "<ul><li>a</li><li>b</li><li>c</li></ul>");
    assert_eq!(rendered.nodes()[0].children().len(), 3);

    // structural replacement discards the previous node set wholesale
    items.set(Value::List(vec![
        Value::from("<li>w</li>"),
        Value::from("<li>x</li>"),
        Value::from("<li>y</li>"),
        Value::from("<li>z</li>"),
    ]));
    assert_eq!(
        rendered.to_html(),
        "<ul><li>w</li><li>x</li><li>y</li><li>z</li></ul>"
    );
    assert_eq!(rendered.nodes()[0].children().len(), 4);
    Ok(())
}

#[test]
fn mapped_source_drives_a_list() -> Result<(), TemplateError> {
    let users = Source::new(vec!["Alice".to_string(), "Bob".to_string()]);
    let view = users.map(|names| {
        Value::List(
            names
                .iter()
                .map(|name| Value::from(format!("<li>{name}</li>")))
                .collect(),
        )
    });

    let rendered = html!("<ul>" (view.clone()) "</ul>")?;
    assert_eq!(rendered.to_html(), "<ul><li>Alice</li><li>Bob</li></ul>");

    users.set(vec!["Eve".to_string()]);
    assert_eq!(rendered.to_html(), "<ul><li>Eve</li></ul>");
    Ok(())
}

#[test]
fn nested_templates_compose() -> Result<(), TemplateError> {
    fn button(label: &str) -> Rendered {
        html!("<button>" (label) "</button>").expect("button template")
    }

    let rendered = html!("<div>" (button("go")) "</div>")?;
    assert_eq!(rendered.to_html(), "<div><button>go</button></div>");
    Ok(())
}

#[test]
fn dispose_tears_down_the_bindings() -> Result<(), TemplateError> {
    let source = Source::new(Value::from("a"));
    let rendered = html!("<p>" (source.clone()) "</p>")?;
    let p = rendered.node().unwrap();

    rendered.dispose();
    source.set(Value::from("b"));

    assert_eq!(p.text_content(), "a");
    Ok(())
}
