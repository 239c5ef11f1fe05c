//! Example: parse a stylesheet and resolve styles for a small component tree
//!
//! Run with `RUST_LOG=quire_style=debug` to see the parser's diagnostics.

use quire_style::{ComponentContext, ComponentState, Conformance, StyleResolver, StyleTree, Stylesheet};
use tracing_subscriber::EnvFilter;

const STYLESHEET: &str = r#"
:root { --accent: #b03060 }

/* body text */
p { font-size: 10pt; line-height: 14pt; color: #222 }
.chapter > p.lead { font-size: 12pt; font-weight: bold }
.chapter p::before { content: "\2022"; color: var(--accent) }
em { font-style: italic; colour: red }

@media print {
    .chapter { margin: 2cm 1.5cm }
}

@page { size: A4; margin: 20mm }
@page cover { margin: 0 }

@font-face { font-family: Body; src: url('body.woff2') format('woff2'), local('Body Regular') }
"#;

/// Parent index and style attributes per node
struct Components(Vec<(Option<usize>, ComponentContext<'static>)>);

impl StyleTree for Components {
    type NodeId = usize;

    fn component(&self, node: usize) -> Option<ComponentContext<'_>> {
        self.0.get(node).map(|(_, component)| *component)
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.0.get(node).and_then(|(parent, _)| *parent)
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sheet = Stylesheet::parse(STYLESHEET);
    println!("Parsed {} rules, {} errors", sheet.len(), sheet.errors.len());
    for error in &sheet.errors {
        println!("  {error}");
    }
    sheet.check(Conformance::Lax)?;

    let tree = Components(vec![
        (None, ComponentContext::element("document").document()),
        (Some(0), ComponentContext::element("section").with_class("chapter")),
        (Some(1), ComponentContext::element("p").with_class("lead")),
        (Some(2), ComponentContext::element("em")),
        (Some(1), ComponentContext::element("p")),
    ]);

    let resolver = StyleResolver::new(&sheet);
    for (node, style) in resolver.resolve_all(&tree, 0..tree.0.len()) {
        let element = tree.component(node).and_then(|c| c.element).unwrap_or("?");
        println!("{element}#{node}: {}", style.declarations);
    }

    let marker = resolver.resolve(&tree, 2, ComponentState::Before);
    println!("p.lead::before: {}", marker.declarations);

    println!("@page cover: {}", resolver.resolve_page(Some("cover")));
    for face in resolver.font_faces() {
        println!("@font-face {}: {} source(s)", face.family().unwrap_or("?"), face.sources().len());
    }

    println!("\n{}", sheet.to_css());
    Ok(())
}
