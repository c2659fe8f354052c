//! Writes a sample deck of card sprites for trying out the packer.
//!
//!   cargo run -p grid-atlas-cli --example gen_cards -- cards
//!   cargo run -p grid-atlas-cli -- --input cards

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

const CARD_W: u32 = 256;
const CARD_H: u32 = 356;
const SUITS: [&str; 4] = ["clubs", "diamonds", "hearts", "spades"];
const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "jack", "queen", "king", "ace",
];

fn draw_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, c: [u8; 4]) {
    let (iw, ih) = img.dimensions();
    for yy in y.min(ih)..(y.saturating_add(h)).min(ih) {
        for xx in x.min(iw)..(x.saturating_add(w)).min(iw) {
            img.put_pixel(xx, yy, Rgba(c));
        }
    }
}

/// White card with a suit-coloured border and rank pips; corners stay transparent.
fn card(rng: &mut impl Rng, suit: usize, rank: usize) -> RgbaImage {
    let mut img = RgbaImage::new(CARD_W, CARD_H);
    draw_rect(&mut img, 4, 0, CARD_W - 8, CARD_H, [250, 250, 245, 255]);
    draw_rect(&mut img, 0, 4, CARD_W, CARD_H - 8, [250, 250, 245, 255]);
    let ink = if suit == 1 || suit == 2 {
        [200, 30, 40, 255]
    } else {
        [20, 20, 30, 255]
    };
    draw_rect(&mut img, 8, 8, CARD_W - 16, 3, ink);
    draw_rect(&mut img, 8, CARD_H - 11, CARD_W - 16, 3, ink);
    for pip in 0..=rank.min(9) {
        let jitter: u32 = rng.gen_range(0..6);
        let x = 40 + (pip as u32 % 3) * 64 + jitter;
        let y = 40 + (pip as u32 / 3) * 72;
        draw_rect(&mut img, x, y, 24, 24, ink);
    }
    img
}

fn main() -> anyhow::Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("cards"));
    fs::create_dir_all(&out)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(52);
    for (s, suit) in SUITS.iter().enumerate() {
        for (r, rank) in RANKS.iter().enumerate() {
            let path = out.join(format!("{rank}_of_{suit}.png"));
            card(&mut rng, s, r).save(&path)?;
        }
    }
    let mut back = RgbaImage::from_pixel(CARD_W, CARD_H, Rgba([30, 60, 140, 255]));
    draw_rect(&mut back, 16, 16, CARD_W - 32, CARD_H - 32, [60, 100, 190, 255]);
    back.save(out.join("back.png"))?;
    println!("wrote 53 cards to {}", out.display());
    Ok(())
}
