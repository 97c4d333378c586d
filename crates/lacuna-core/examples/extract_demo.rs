use lacuna_core::{extract_holes, segment_content, ContentSegment, Rating};

fn main() {
    let content = "<p>La capitale de la France est [[HOLE:3fa2c8-01|Paris]].</p>\
                   <p>L'eau bout à [[HOLE:b4d901-02|100 °C]] au niveau de la mer.</p>";

    // Example 1: extract the markers an editor would sync after saving
    println!("=== Example 1: Extract hole markers ===");
    let holes = extract_holes(content);
    println!("Found {} holes:", holes.len());
    for hole in &holes {
        println!("  - {} -> '{}'", hole.id, hole.text);
    }

    // Example 2: segment the content for rendering
    println!("\n=== Example 2: Segment content ===");
    for segment in segment_content(content) {
        match segment {
            ContentSegment::Html { html } => println!("  html: {:?}", html),
            ContentSegment::Hole { id, text } => println!("  hole: {} ({:?})", id, text),
        }
    }

    // Example 3: a review session over a single hole
    println!("\n=== Example 3: Review scoring ===");
    let mut points = 0.0;
    for rating in [Rating::Oui, Rating::Oui, Rating::PlutotOui, Rating::Non] {
        points = rating.apply(points);
        println!("  rated {:<10} -> {} points", rating.to_string(), points);
    }

    // Example 4: iteration advance decays points by 1, floored at zero
    println!("\n=== Example 4: Iteration decay ===");
    let mut points = 1.5;
    for _ in 0..3 {
        points = (points - 1.0_f64).max(0.0);
        println!("  after advance -> {} points", points);
    }
}
