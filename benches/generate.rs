use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use segpix::{Generator, Subjects};

fn hex(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn portrait() -> (RgbaImage, Subjects<RgbaImage>, Subjects<Vec<String>>) {
    let img = RgbaImage::from_fn(512, 512, |x, y| {
        Rgba([(x / 2) as u8, (y / 2) as u8, ((x ^ y) & 0xff) as u8, 255])
    });
    let skin = RgbaImage::from_fn(64, 64, |x, y| {
        let inside = (x as i32 - 32).pow(2) + (y as i32 - 32).pow(2) < 400;
        Rgba([0, 0, 0, if inside { 255 } else { 0 }])
    });
    let background = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
    let masks = [("skin", skin), ("background", background)]
        .into_iter()
        .collect();
    let palettes = [
        ("skin", hex(&["#FFDBAC", "#F1C27D", "#E0AC69", "#C68642", "#8D5524"])),
        (
            "background",
            hex(&["#1B1B3A", "#693668", "#A74482", "#F84AA7", "#FF3562", "#2E86AB"]),
        ),
    ]
    .into_iter()
    .collect();
    (img, masks, palettes)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (img, masks, palettes) = portrait();

    c.bench_function("generate 512x512 block 8", |b| {
        let generator = Generator::new(8);
        b.iter(|| generator.generate(black_box(&img), &masks, &palettes))
    });

    c.bench_function("generate 512x512 block 8 single-threaded", |b| {
        let generator = Generator::new(8).parallel(false);
        b.iter(|| generator.generate(black_box(&img), &masks, &palettes))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
