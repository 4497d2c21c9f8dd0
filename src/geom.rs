#[cfg(test)]
#[path = "./geom_test.rs"]
mod geom_test;

/// Closed-interval containment of (x, y) in the box (x1, y1)-(x2, y2).
pub fn point_within(x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    x >= x1 && x <= x2 && y >= y1 && y <= y2
}

/// Box-vs-box intersection as an 8-way corner-containment OR. Kept in this
/// exact formulation so corner-touching and zero-area boxes behave the same
/// as the original engine.
#[rustfmt::skip]
pub fn overlap(x1: i32, y1: i32, x2: i32, y2: i32,
               x3: i32, y3: i32, x4: i32, y4: i32) -> bool {
    point_within(x1, y1, x3, y3, x4, y4)
        || point_within(x2, y1, x3, y3, x4, y4)
        || point_within(x1, y2, x3, y3, x4, y4)
        || point_within(x2, y2, x3, y3, x4, y4)
        || point_within(x3, y3, x1, y1, x2, y2)
        || point_within(x4, y3, x1, y1, x2, y2)
        || point_within(x3, y4, x1, y1, x2, y2)
        || point_within(x4, y4, x1, y1, x2, y2)
}
