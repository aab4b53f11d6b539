use sprig_core::Source;
use sprig_dom::{Event, NodeRef};
use sprig_html::{Rendered, TemplateError, Value, html};

/// A small reusable component: a button wired to a click handler.
fn button(label: Value, on_click: impl Fn(&Event) + 'static) -> Result<Rendered, TemplateError> {
    html!("<button onclick=\"" (Value::handler(on_click)) "\">" (label) "</button>")
}

fn find_all(root: &NodeRef, tag: &str) -> Vec<NodeRef> {
    root.descendant_elements()
        .into_iter()
        .filter(|el| el.tag().as_deref() == Some(tag))
        .collect()
}

fn main() -> Result<(), TemplateError> {
    let count = Source::new(Value::Int(0));
    let shown = Source::new(Value::Bool(true));
    let users = Source::new(vec![
        "Alice".to_string(),
        "Bob".to_string(),
        "Charlie".to_string(),
    ]);
    let username = Source::new(Value::from("Steve"));

    // Derived: the add button only shows while the input holds a name.
    let name_valid = {
        let username = username.clone();
        Value::func(move || Value::Bool(!username.get().as_str().unwrap_or("").is_empty()))
    };

    // Derived class name flips with the counter's parity.
    let parity_class = count.map(|value| {
        Value::from(if value.as_int().unwrap_or(0) % 2 == 0 {
            "even"
        } else {
            "odd"
        })
    });

    // Reactive list: every change to `users` re-renders the whole item set.
    let user_list = {
        let all = users.clone();
        users.map(move |names| {
            Value::List(
                names
                    .iter()
                    .map(|name| {
                        let label = name.clone();
                        let target = name.clone();
                        let remove_from = all.clone();
                        let item = html!(
                            "<li onclick=\"" (Value::handler(move |_| {
                                let mut remaining = remove_from.get();
                                remaining.retain(|n| n != &target);
                                remove_from.set(remaining);
                            })) "\">" (label) "</li>"
                        )
                        .expect("list item template");
                        Value::from(item)
                    })
                    .collect(),
            )
        })
    };

    let count_up = {
        let count = count.clone();
        Value::handler(move |_| {
            let n = count.get().as_int().unwrap_or(0);
            count.set(Value::Int(n + 1));
        })
    };

    let toggle = {
        let shown = shown.clone();
        move |_: &Event| {
            let flag = matches!(shown.get(), Value::Bool(true));
            shown.set(Value::Bool(!flag));
        }
    };

    let add_user = {
        let users = users.clone();
        let username = username.clone();
        move |_: &Event| {
            let name = username.get().as_str().unwrap_or("").to_string();
            if name.is_empty() {
                return;
            }
            let mut all = users.get();
            all.push(name);
            users.set(all);
            username.set(Value::from(""));
        }
    };
    let add_button = button(Value::from("Add user"), add_user)?;

    let page = html!(
        "<main>"
            "<h1>Sprig showcase</h1>"
            "<p>"
                "<button onclick=\"" (count_up) "\">Count up</button>"
                "<span class=\"" (parity_class.clone()) "\"><b>Count is:</b> " (count.clone()) "</span>"
            "</p>"
            "<p>"
                (button(Value::from("Toggle"), toggle)?)
                "<span if=\"" (shown.clone()) "\">the span is shown</span>"
                "<span else>the span is hidden</span>"
            "</p>"
            "<ul>" (user_list.clone()) "</ul>"
            "<input type=\"text\" placeholder=\"Enter a name...\" value=\"" (username.clone()) "\">"
            "<span if=\"" (name_valid) "\">" (add_button) "</span>"
            "<span else>Enter a name to add a user</span>"
        "</main>"
    )?;

    let root = page.node().expect("single root");
    println!("initial page:\n{}\n", page.to_html());

    // Count up twice: the text and the parity class follow.
    let buttons = find_all(&root, "button");
    buttons[0].dispatch("click");
    buttons[0].dispatch("click");
    println!("count after two clicks: {:?}", count.get());

    // Toggle the conditional span off and back on.
    buttons[1].dispatch("click");
    println!("toggled off:\n{}\n", page.to_html());
    buttons[1].dispatch("click");

    // Click the first list item to remove that user.
    let items = find_all(&root, "li");
    items[0].dispatch("click");
    println!("users after removing one: {:?}", users.get());

    // Type a name and add it through the two-way bound input.
    let input = find_all(&root, "input")
        .into_iter()
        .next()
        .expect("the input");
    input.set_value("Dana");
    input.dispatch("input");
    let add = find_all(&root, "button")
        .into_iter()
        .next_back()
        .expect("the add button");
    add.dispatch("click");
    println!("users after adding Dana: {:?}", users.get());

    println!("final page:\n{}", page.to_html());
    Ok(())
}
