//! On-demand DOM state dumps for diagnosing blank-screen failures without
//! an attached debugger.

use web_sys::{Document, Element};

fn rect_summary(element: Option<&Element>) -> String {
    let Some(element) = element else {
        return String::from("rect=null");
    };
    let rect = element.get_bounding_client_rect();
    format!(
        "rect={},{},{},{}",
        rect.left().round(),
        rect.top().round(),
        rect.width().round(),
        rect.height().round()
    )
}

fn style_summary(element: Option<&Element>) -> String {
    let Some(element) = element else {
        return String::from("style=null");
    };
    let style = web_sys::window()
        .and_then(|win| win.get_computed_style(element).ok())
        .flatten();
    let Some(style) = style else {
        return String::from("style=?");
    };
    let prop = |name: &str| style.get_property_value(name).unwrap_or_default();
    format!(
        "display={} visibility={} opacity={} position={} bg={}",
        prop("display"),
        prop("visibility"),
        prop("opacity"),
        prop("position"),
        prop("background-color")
    )
}

fn count_of(doc: &Document, selector: &str) -> u32 {
    doc.query_selector_all(selector)
        .map(|list| list.length())
        .unwrap_or(0)
}

fn collapsed_text(element: &Element, limit: usize) -> String {
    let text = element.text_content().unwrap_or_default();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(limit).collect()
}

/// Log a structured description of the mount point, the main content
/// region, and the element under the viewport center.
///
/// Never fails the caller; an unreadable document produces a single
/// dump-error line instead.
pub fn snapshot_dom(tag: &str) {
    let Some(doc) = web_sys::window().and_then(|win| win.document()) else {
        super::log(format!("[{tag}] dump error: document unavailable"));
        return;
    };

    let app = doc.get_element_by_id("app");
    let app_nodes = app
        .as_ref()
        .map_or(-1, |el| i64::from(el.child_nodes().length()));
    super::log(format!(
        "[{tag}] #app nodes={app_nodes} {} {}",
        rect_summary(app.as_ref()),
        style_summary(app.as_ref())
    ));

    let main = doc.query_selector("main").ok().flatten();
    let main_desc = main.as_ref().map_or_else(
        || String::from("null"),
        |el| {
            let id = el.id();
            let class = el.class_name();
            format!(
                "id={} class={}",
                if id.is_empty() { "(none)" } else { id.as_str() },
                if class.is_empty() { "(none)" } else { class.as_str() }
            )
        },
    );
    super::log(format!(
        "[{tag}] <main> {main_desc} {} {}",
        rect_summary(main.as_ref()),
        style_summary(main.as_ref())
    ));

    super::log(format!(
        "[{tag}] buttons={} canvases={}",
        count_of(&doc, "button"),
        count_of(&doc, "canvas")
    ));

    if let Some(main) = &main {
        if let Some(child) = main.first_element_child() {
            super::log(format!(
                "[{tag}] <main> child0 <{}> {} {}",
                child.tag_name().to_ascii_lowercase(),
                rect_summary(Some(&child)),
                style_summary(Some(&child))
            ));
        }
        let text = collapsed_text(main, 140);
        if !text.is_empty() {
            super::log(format!("[{tag}] mainText={text}"));
        }
    }

    let center = web_sys::window().and_then(|win| {
        let width = win.inner_width().ok()?.as_f64()?;
        let height = win.inner_height().ok()?.as_f64()?;
        Some((width / 2.0, height / 2.0))
    });
    if let Some((cx, cy)) = center
        && let Some(hit) = doc.element_from_point(cx as f32, cy as f32)
    {
        super::log(format!(
            "[{tag}] elementFromPoint({cx:.0},{cy:.0})=<{}>#{}.{}",
            hit.tag_name().to_ascii_lowercase(),
            hit.id(),
            hit.class_name()
        ));
    }
}
