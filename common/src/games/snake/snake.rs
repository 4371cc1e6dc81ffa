use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

#[derive(Clone, Debug)]
pub struct Snake {
    pub body: VecDeque<Point>,
    pub body_set: HashSet<Point>,
    /// Heading applied on the last tick; `None` until the first move.
    pub heading: Option<Direction>,
    pub pending_heading: Option<Direction>,
}

impl Snake {
    pub fn new(start_pos: Point) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        body.push_back(start_pos);
        body_set.insert(start_pos);

        Self {
            body,
            body_set,
            heading: None,
            pending_heading: None,
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// Latches `direction` for the next tick. Reversals are checked against the heading
    /// that was actually applied, not the pending one, so two quick turns inside one
    /// frame can never fold the head back onto the neck.
    pub fn request_heading(&mut self, direction: Direction) -> bool {
        if let Some(current) = self.heading
            && direction.is_opposite(&current)
        {
            return false;
        }
        self.pending_heading = Some(direction);
        true
    }

    pub fn apply_pending_heading(&mut self) {
        if let Some(direction) = self.pending_heading.take() {
            self.heading = Some(direction);
        }
    }

    /// Moves the head to `next_head`, dropping the tail unless `grow` is set.
    /// Returns whether the new head landed on the remaining body.
    pub fn advance(&mut self, next_head: Point, grow: bool) -> bool {
        if !grow && let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }

        let collided = self.body_set.contains(&next_head);
        self.body.push_front(next_head);
        self.body_set.insert(next_head);
        collided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_of(points: &[(i32, i32)], heading: Direction) -> Snake {
        let mut snake = Snake::new(Point::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            snake.body.push_back(Point::new(x, y));
            snake.body_set.insert(Point::new(x, y));
        }
        snake.heading = Some(heading);
        snake
    }

    #[test]
    fn test_reversal_rejected_when_longer_than_one() {
        let mut snake = snake_of(&[(5, 5), (4, 5)], Direction::Right);
        assert!(!snake.request_heading(Direction::Left));
        assert_eq!(snake.pending_heading, None);
    }

    #[test]
    fn test_reversal_rejected_for_single_segment() {
        let mut snake = snake_of(&[(5, 5)], Direction::Right);
        assert!(!snake.request_heading(Direction::Left));
        assert_eq!(snake.pending_heading, None);
        assert!(snake.request_heading(Direction::Right));
        assert_eq!(snake.pending_heading, Some(Direction::Right));
    }

    #[test]
    fn test_any_direction_allowed_before_first_move() {
        let mut snake = Snake::new(Point::new(5, 5));
        assert!(snake.request_heading(Direction::Left));
        assert_eq!(snake.pending_heading, Some(Direction::Left));
    }

    #[test]
    fn test_two_turns_in_one_frame_cannot_reverse() {
        let mut snake = snake_of(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        assert!(snake.request_heading(Direction::Up));
        assert!(!snake.request_heading(Direction::Left));
        snake.apply_pending_heading();
        assert_eq!(snake.heading, Some(Direction::Up));
    }

    #[test]
    fn test_last_valid_request_wins() {
        let mut snake = snake_of(&[(5, 5), (4, 5)], Direction::Right);
        assert!(snake.request_heading(Direction::Up));
        assert!(snake.request_heading(Direction::Down));
        snake.apply_pending_heading();
        assert_eq!(snake.heading, Some(Direction::Down));
    }

    #[test]
    fn test_advance_into_vacated_tail_is_not_collision() {
        let mut snake = snake_of(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::Left);
        let collided = snake.advance(Point::new(4, 5), false);
        assert!(!collided);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body_set.len(), 4);
    }

    #[test]
    fn test_advance_into_tail_while_growing_collides() {
        let mut snake = snake_of(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::Left);
        assert!(snake.advance(Point::new(4, 5), true));
    }

    #[test]
    fn test_advance_grow_keeps_tail() {
        let mut snake = snake_of(&[(5, 5)], Direction::Right);
        snake.advance(Point::new(6, 5), true);
        assert_eq!(snake.body, VecDeque::from(vec![Point::new(6, 5), Point::new(5, 5)]));
    }
}
