//! Drawing contract
//!
//! The simulation hands out a back-to-front list of [`Drawable`]s; this
//! module turns them into calls on a [`Canvas`], a small 2D surface any host
//! can implement (the web host wraps a canvas 2D context).

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::sim::effects::{Explosion, Particle, Star};
use crate::sim::entity::{Arena, Drawable};
use crate::sim::projectile::Projectile;
use crate::sim::ship::{Behavior, Ship};
use crate::tuning::{BulletKind, Faction, ShipType};

/// A CSS-style colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(u8, u8, u8),
    /// Hue in degrees, saturation and lightness in percent
    Hsl(f32, f32, f32),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub fn css(&self) -> String {
        match self {
            Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
            Color::Hsl(h, s, l) => format!("hsl({h}, {s}%, {l}%)"),
        }
    }
}

/// Minimal immediate-mode 2D surface
pub trait Canvas {
    type Image;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, color: Color);
    fn set_stroke(&mut self, color: Color, width: f32);
    /// Glow around subsequent shapes; blur 0 turns it off
    fn set_shadow(&mut self, blur: f32, color: Color);
    /// Axis-aligned in the current transform, top-left at `origin`
    fn fill_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2);
    fn draw_image(&mut self, image: &Self::Image, origin: Vec2, size: Vec2);
}

/// Ship images by type. A type with no image is drawn as a placeholder.
pub struct SpriteAtlas<I> {
    sprites: HashMap<ShipType, I>,
    reported: HashSet<ShipType>,
}

impl<I> Default for SpriteAtlas<I> {
    fn default() -> Self {
        Self {
            sprites: HashMap::new(),
            reported: HashSet::new(),
        }
    }
}

impl<I> SpriteAtlas<I> {
    pub fn insert(&mut self, ship_type: ShipType, image: I) {
        self.sprites.insert(ship_type, image);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Image for a type; warns once per missing type
    pub fn sprite(&mut self, ship_type: ShipType) -> Option<&I> {
        if !self.sprites.contains_key(&ship_type) && self.reported.insert(ship_type) {
            log::warn!("No sprite for {}, drawing placeholder", ship_type.key());
        }
        self.sprites.get(&ship_type)
    }
}

/// Asset path a host loads the sprite for `ship_type` from
pub fn sprite_path(ship_type: ShipType) -> String {
    format!("assets/ships/{}.png", ship_type.key())
}

fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Player => Color::Rgb(0x44, 0x44, 0xff),
        Faction::Enemy => Color::Rgb(0xff, 0x44, 0x44),
    }
}

fn glow_color(faction: Faction, selected: bool) -> Color {
    match (faction, selected) {
        (Faction::Player, true) => Color::Rgb(0x66, 0x66, 0xff),
        (Faction::Player, false) => Color::Rgb(0x44, 0x44, 0xff),
        (Faction::Enemy, true) => Color::Rgb(0xff, 0x66, 0x66),
        (Faction::Enemy, false) => Color::Rgb(0xff, 0x44, 0x44),
    }
}

fn bullet_color(kind: BulletKind, faction: Faction) -> Color {
    match kind {
        BulletKind::Laser => Color::Rgb(0x00, 0xff, 0xff),
        BulletKind::Plasma => Color::Rgb(0xff, 0x00, 0xff),
        BulletKind::Rapid => Color::Rgb(0xff, 0xff, 0x00),
        BulletKind::Missile => Color::Rgb(0xff, 0x44, 0x00),
        BulletKind::Heavy => Color::Rgb(0xff, 0x00, 0x00),
        BulletKind::Ray => match faction {
            Faction::Player => Color::Rgb(0x00, 0xff, 0xff),
            Faction::Enemy => Color::Rgb(0xff, 0x00, 0x00),
        },
        BulletKind::Bullet => match faction {
            Faction::Player => Color::Rgb(0xff, 0xff, 0x00),
            Faction::Enemy => Color::Rgb(0xff, 0x44, 0x44),
        },
    }
}

/// Clear to black and draw one frame
pub fn draw_frame<C: Canvas>(
    canvas: &mut C,
    atlas: &mut SpriteAtlas<C::Image>,
    arena: &Arena,
    drawables: &[Drawable<'_>],
) {
    canvas.set_alpha(1.0);
    canvas.set_fill(Color::BLACK);
    canvas.fill_rect(Vec2::ZERO, Vec2::new(arena.width, arena.height));

    for drawable in drawables {
        match *drawable {
            Drawable::Star(star) => draw_star(canvas, star),
            Drawable::Particle(particle) => draw_particle(canvas, particle),
            Drawable::Explosion(explosion) => draw_explosion(canvas, explosion),
            Drawable::Projectile(projectile) => draw_projectile(canvas, projectile),
            Drawable::Ship { ship, selected } => draw_ship(canvas, atlas, ship, selected),
        }
    }
}

fn draw_star<C: Canvas>(canvas: &mut C, star: &Star) {
    let color = match star.tint {
        Some(hue) => Color::Hsl(hue, 70.0, 80.0),
        None => Color::WHITE,
    };
    canvas.save();
    canvas.set_alpha(star.opacity);
    canvas.set_fill(color);
    canvas.fill_circle(star.pos, star.size / 2.0);
    canvas.restore();
}

fn draw_particle<C: Canvas>(canvas: &mut C, particle: &Particle) {
    canvas.save();
    canvas.set_alpha(particle.alpha());
    canvas.set_fill(Color::Hsl(particle.hue, 100.0, 50.0));
    canvas.fill_circle(particle.pos, 2.0);
    canvas.restore();
}

fn draw_explosion<C: Canvas>(canvas: &mut C, explosion: &Explosion) {
    let r = explosion.current_radius();
    canvas.save();
    canvas.set_alpha(1.0 - explosion.progress());
    canvas.set_fill(Color::Rgb(0xff, 0x44, 0x44));
    canvas.fill_circle(explosion.pos, r);
    canvas.set_fill(Color::Rgb(0xff, 0xff, 0x44));
    canvas.fill_circle(explosion.pos, r * 0.6);
    canvas.restore();
}

fn draw_projectile<C: Canvas>(canvas: &mut C, projectile: &Projectile) {
    let color = bullet_color(projectile.kind, projectile.faction);
    canvas.save();
    match projectile.kind {
        BulletKind::Bullet => {
            canvas.set_fill(color);
            canvas.fill_circle(projectile.pos, projectile.radius);
        }
        BulletKind::Ray => {
            let r = projectile.radius;
            canvas.translate(projectile.pos);
            canvas.rotate(projectile.angle);
            canvas.set_fill(color);
            canvas.fill_rect(Vec2::new(-r, -2.0), Vec2::new(r * 2.0, 4.0));
        }
        _ => {
            // Full strength until the last tenth of life, then fade out
            let fade = (projectile.life_fraction() * 10.0).min(1.0);
            draw_trail(canvas, projectile, color, fade);

            canvas.set_alpha(fade);
            canvas.set_shadow(10.0, color);
            canvas.set_fill(color);
            canvas.fill_circle(projectile.pos, projectile.radius);
        }
    }
    canvas.restore();
}

/// Oldest point faintest and thinnest
fn draw_trail<C: Canvas>(canvas: &mut C, projectile: &Projectile, color: Color, fade: f32) {
    let points: Vec<Vec2> = projectile
        .trail
        .iter()
        .copied()
        .chain(std::iter::once(projectile.pos))
        .collect();
    if points.len() < 2 {
        return;
    }
    let n = points.len() as f32;
    for (i, pair) in points.windows(2).enumerate() {
        let t = (i + 1) as f32 / n;
        canvas.set_alpha(t * 0.8 * fade);
        canvas.set_stroke(color, projectile.radius * t);
        canvas.stroke_line(pair[0], pair[1]);
    }
}

fn draw_ship<C: Canvas>(
    canvas: &mut C,
    atlas: &mut SpriteAtlas<C::Image>,
    ship: &Ship,
    selected: bool,
) {
    let stationed = ship.behavior == Behavior::Stationed;
    // Survival art points up; fleet art is already aligned with the heading
    let rotation = if stationed {
        ship.angle
    } else {
        ship.angle + FRAC_PI_2
    };

    canvas.save();
    canvas.translate(ship.pos);
    if stationed {
        canvas.set_shadow(
            if selected { 25.0 } else { 15.0 },
            glow_color(ship.faction(), selected),
        );
    }
    canvas.rotate(rotation);
    match atlas.sprite(ship.ship_type) {
        Some(image) => {
            let s = ship.sprite_size;
            canvas.draw_image(image, Vec2::splat(-s / 2.0), Vec2::splat(s));
        }
        None => {
            let s = if stationed {
                ship.sprite_size
            } else {
                ship.radius * 2.0
            };
            canvas.set_fill(faction_color(ship.faction()));
            canvas.fill_rect(Vec2::splat(-s / 2.0), Vec2::splat(s));
        }
    }
    canvas.restore();

    if !stationed && ship.hull() < ship.max_hull() {
        draw_health_bar(canvas, ship);
    }
}

fn draw_health_bar<C: Canvas>(canvas: &mut C, ship: &Ship) {
    let width = ship.radius * 2.0;
    let origin = Vec2::new(ship.pos.x - ship.radius, ship.pos.y - ship.radius - 10.0);
    canvas.save();
    canvas.set_fill(Color::Rgb(0xff, 0x00, 0x00));
    canvas.fill_rect(origin, Vec2::new(width, 4.0));
    canvas.set_fill(Color::Rgb(0x00, 0xff, 0x00));
    canvas.fill_rect(origin, Vec2::new(width * ship.hull_fraction(), 4.0));
    canvas.restore();
}
