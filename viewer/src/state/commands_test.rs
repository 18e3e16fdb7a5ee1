use super::*;

#[test]
fn push_bumps_sequence() {
    let mut queue = CommandQueue::default();
    assert_eq!(queue.seq(), 0);
    queue.push(Command::FitToView);
    queue.push(Command::ClearSelection);
    assert_eq!(queue.seq(), 2);
}

#[test]
fn take_drains_in_push_order() {
    let mut queue = CommandQueue::default();
    queue.push(Command::SetEditMode(true));
    queue.push(Command::SaveEdits);
    assert_eq!(queue.take(), vec![Command::SetEditMode(true), Command::SaveEdits]);
    assert!(queue.is_empty());
    assert!(queue.take().is_empty());
}

#[test]
fn sequence_survives_draining() {
    let mut queue = CommandQueue::default();
    queue.push(Command::DiscardEdits);
    queue.take();
    queue.push(Command::FitToView);
    assert_eq!(queue.seq(), 2);
}
