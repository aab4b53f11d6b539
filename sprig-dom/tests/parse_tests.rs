use sprig_dom::parse;

#[test]
fn parse_nested_elements() {
    let nodes = parse("<div><p>Hello</p></div>");
    assert_eq!(nodes.len(), 1);
    let div = &nodes[0];
    assert_eq!(div.tag().unwrap(), "div");
    let kids = div.children();
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0].tag().unwrap(), "p");
    assert_eq!(kids[0].text_content(), "Hello");
}

#[test]
fn parse_attributes() {
    let nodes = parse(r#"<input type="text" placeholder='name' disabled>"#);
    assert_eq!(nodes.len(), 1);
    let input = &nodes[0];
    assert_eq!(input.attr("type").unwrap(), "text");
    assert_eq!(input.attr("placeholder").unwrap(), "name");
    // boolean attribute parses to an empty value
    assert_eq!(input.attr("disabled").unwrap(), "");
}

#[test]
fn parse_void_and_self_closing() {
    let nodes = parse(r#"<div><br /><p>text</p><img src="x.png"></div>"#);
    assert_eq!(nodes.len(), 1);
    let elements: Vec<_> = nodes[0].children().into_iter().filter(|n| n.is_element()).collect();
    assert_eq!(elements.len(), 3); // br, p, img
    assert!(elements[2].children().is_empty());
}

#[test]
fn parse_comments() {
    let nodes = parse("<div><!-- anchor --></div>");
    let kids = nodes[0].children();
    assert_eq!(kids.len(), 1);
    assert!(kids[0].is_comment());
}

#[test]
fn whitespace_between_roots_is_dropped() {
    let nodes = parse("<div></div>\n    <div></div>");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.is_element()));
}

#[test]
fn interior_whitespace_is_preserved() {
    let nodes = parse("<span><b>Count:</b> 3</span>");
    assert_eq!(nodes[0].text_content(), "Count: 3");
}

#[test]
fn stray_angle_bracket_is_text() {
    let nodes = parse("<p>1 < 2</p>");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].text_content(), "1 < 2");
}

#[test]
fn unclosed_tags_drain_best_effort() {
    let nodes = parse("<div><span>inner");
    assert_eq!(nodes.len(), 1);
    let div = &nodes[0];
    assert_eq!(div.tag().unwrap(), "div");
    let kids = div.children();
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0].tag().unwrap(), "span");
    assert_eq!(kids[0].text_content(), "inner");
}

#[test]
fn serialize_round_trip() {
    let html = r#"<div class="app"><span>hi</span><!--note--></div>"#;
    let nodes = parse(html);
    assert_eq!(sprig_dom::to_html(&nodes), html);
}
