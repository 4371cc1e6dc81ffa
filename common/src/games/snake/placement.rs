use crate::games::SessionRng;
use super::types::Point;

/// Rejection-samples a free cell in `[0, tile_count)²`.
///
/// After `attempts` rejected draws the free cells are enumerated and one is picked
/// uniformly, so a crowded grid still terminates. `None` only when no cell is free.
pub fn find_free_cell<F>(
    rng: &mut SessionRng,
    tile_count: i32,
    attempts: u32,
    is_occupied: F,
) -> Option<Point>
where
    F: Fn(&Point) -> bool,
{
    for _ in 0..attempts {
        let candidate = Point::new(
            rng.random_range(0..tile_count),
            rng.random_range(0..tile_count),
        );
        if !is_occupied(&candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Point> = (0..tile_count)
        .flat_map(|y| (0..tile_count).map(move |x| Point::new(x, y)))
        .filter(|p| !is_occupied(p))
        .collect();
    rng.pick(&free)
}
