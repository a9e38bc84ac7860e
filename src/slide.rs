use raylib::prelude::*;
use crate::constants::*;
use crate::host::Renderer;

pub struct Slide {
    pub text: String,

    // Accessibility-hidden: every slide but the active one
    pub hidden: bool,
}

/// Horizontal strip of slides, shifted by whole bar widths toward the active one.
pub struct SlideTrack {
    slides: Vec<Slide>,

    offset: f32,        // Percent of the bar width, 0 shows the first slide
    target_offset: f32,

    animation_timer: f32,
    is_animating: bool,
    tween_offset: Option<ease::Tween>,
}

impl SlideTrack {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            slides: texts
                .into_iter()
                .map(|text| Slide { text, hidden: false })
                .collect(),
            offset: 0.0,
            target_offset: 0.0,
            animation_timer: 0.0,
            is_animating: false,
            tween_offset: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target_offset(&self) -> f32 {
        self.target_offset
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_animating {
            return;
        }

        self.animation_timer += dt;
        if let Some(tween) = self.tween_offset.as_mut() {
            self.offset = tween.apply(dt);
        }

        if self.animation_timer >= SLIDE_DURATION {
            self.is_animating = false;
            self.offset = self.target_offset;
            self.tween_offset = None;
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, bounds: Rectangle) {
        d.draw_rectangle_rec(bounds, Color::BLACK);

        let mut s = d.begin_scissor_mode(
            bounds.x as i32,
            bounds.y as i32,
            bounds.width as i32,
            bounds.height as i32,
        );

        for (i, slide) in self.slides.iter().enumerate() {
            let slot_x = bounds.x + bounds.width * (i as f32 * 100.0 + self.offset) / 100.0;

            // Only the slots overlapping the bar are worth drawing
            if slot_x + bounds.width <= bounds.x || slot_x >= bounds.x + bounds.width {
                continue;
            }

            let text_width = s.measure_text(&slide.text, FONT_SIZE) as f32;
            let text_x = slot_x + (bounds.width - text_width) * 0.5;
            let text_y = bounds.y + (bounds.height - FONT_SIZE as f32) * 0.5;
            s.draw_text(&slide.text, text_x as i32, text_y as i32, FONT_SIZE, Color::WHITE);
        }
    }
}

impl Renderer for SlideTrack {
    fn reconcile(&mut self, index: usize, count: usize) {
        debug_assert_eq!(count, self.slides.len());

        self.target_offset = -(index as f32) * 100.0;
        self.tween_offset = Some(ease::Tween::new(
            ease::cubic_out,
            self.offset,
            self.target_offset,
            SLIDE_DURATION,
        ));
        self.animation_timer = 0.0;
        self.is_animating = true;

        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.hidden = i != index;
        }
    }
}
