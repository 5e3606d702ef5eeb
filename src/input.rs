/// Remembers whether a key was down on the previous frame so that a held key
/// only fires once.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyEdge {
    was_down: bool,
}

impl KeyEdge {
    pub fn new() -> KeyEdge {
        KeyEdge::default()
    }

    /// Feeds this frame's key state. Returns true on the frame the key goes down.
    pub fn pressed(&mut self, is_down: bool) -> bool {
        let pressed = is_down && !self.was_down;
        self.was_down = is_down;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut edge = KeyEdge::new();

        let frames = [false, true, true, true, false, true, false];
        let fired: Vec<bool> = frames.iter().map(|&down| edge.pressed(down)).collect();

        assert_eq!(fired, vec![false, true, false, false, false, true, false]);
    }

    #[test]
    fn key_down_on_first_frame_fires() {
        let mut edge = KeyEdge::new();

        assert!(edge.pressed(true));
        assert!(!edge.pressed(true));
    }
}
