#[derive(Clone, Copy, Debug)]
pub struct Glyphs {
    pub led_on: &'static str,
    pub led_off: &'static str,
    pub cursor_on: &'static str,
    pub cursor_off: &'static str,
    pub current_marker: &'static str,
    pub playing: &'static str,
    pub paused: &'static str,
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        led_on: "##",
        led_off: "..",
        cursor_on: "[]",
        cursor_off: "[]",
        current_marker: ">",
        playing: "> Play",
        paused: "|| Pause",
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        led_on: "██",
        led_off: "··",
        cursor_on: "▓▓",
        cursor_off: "░░",
        current_marker: "▶",
        playing: "▶ Playing",
        paused: "⏸ Paused",
    }
}
