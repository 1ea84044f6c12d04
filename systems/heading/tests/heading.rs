use joyful_snake_core::Heading;
use joyful_snake_system_heading::resolve;

#[test]
fn reversal_keeps_current_heading() {
    assert_eq!(resolve(Heading::Up, Heading::Down), Heading::Up);
    assert_eq!(resolve(Heading::Down, Heading::Up), Heading::Down);
    assert_eq!(resolve(Heading::Left, Heading::Right), Heading::Left);
    assert_eq!(resolve(Heading::Right, Heading::Left), Heading::Right);
}

#[test]
fn perpendicular_requests_are_accepted() {
    assert_eq!(resolve(Heading::Up, Heading::Left), Heading::Left);
    assert_eq!(resolve(Heading::Up, Heading::Right), Heading::Right);
    assert_eq!(resolve(Heading::Left, Heading::Down), Heading::Down);
}

#[test]
fn repeating_the_current_heading_is_a_no_op() {
    for heading in Heading::ALL {
        assert_eq!(resolve(heading, heading), heading);
    }
}

#[test]
fn filter_has_no_memory_between_calls() {
    let current = Heading::Up;
    let first = resolve(current, Heading::Left);
    assert_eq!(first, Heading::Left);

    // Still judged against the applied heading, not the previous answer.
    assert_eq!(resolve(current, Heading::Right), Heading::Right);
    assert_eq!(resolve(current, Heading::Down), Heading::Up);
}
