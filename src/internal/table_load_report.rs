#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

use plotters::prelude::*;
use primetable::{
    ChainedHashMap, HashMapExtensions, HashTable, PositionalHasher, ProbingHashMap, SumHasher,
    find_mode,
};
use rand::Rng;

// Keys inserted into every table for the load chart
const KEY_COUNT: usize = 400;
// Bucket count every table starts with
const INITIAL_CAPACITY: usize = 53;
// Print table statistics every this many insertions
const CHECKPOINT: usize = 50;
const CHART_PATH: &str = "table_load.png";
const FONT_FAMILY: &str = "sans-serif";

const COLORS: [RGBColor; 4] = [
    RGBColor(220, 50, 50),  // Bright red
    RGBColor(50, 90, 220),  // Bright blue
    RGBColor(50, 180, 50),  // Bright green
    RGBColor(180, 50, 180), // Bright magenta
];

/// Load factor after every insertion for one table configuration
#[derive(Debug)]
struct Series {
    name: &'static str,
    points: Vec<(usize, f64)>,
}

fn boxed<T: HashTable<u64> + 'static>(table: T) -> Box<dyn HashTable<u64>> {
    Box::new(table)
}

// Both strategies under both reference hash functions
fn tables() -> Vec<(&'static str, Box<dyn HashTable<u64>>)> {
    vec![
        (
            "Probing / sum hash",
            boxed(ProbingHashMap::<u64, _>::with_capacity_and_hasher(INITIAL_CAPACITY, SumHasher)),
        ),
        (
            "Probing / positional hash",
            boxed(ProbingHashMap::<u64, _>::with_capacity_and_hasher(
                INITIAL_CAPACITY,
                PositionalHasher,
            )),
        ),
        (
            "Chained / sum hash",
            boxed(ChainedHashMap::<u64, _>::with_capacity_and_hasher(INITIAL_CAPACITY, SumHasher)),
        ),
        (
            "Chained / positional hash",
            boxed(ChainedHashMap::<u64, _>::with_capacity_and_hasher(
                INITIAL_CAPACITY,
                PositionalHasher,
            )),
        ),
    ]
}

fn print_stats(table: &dyn HashTable<u64>) {
    println!(
        "  empty buckets = {}, load = {:.2}, size = {}, capacity = {}",
        table.empty_buckets(),
        table.table_load(),
        table.size(),
        table.capacity()
    );
}

// Replays the reference put / resize / remove / clear sequence on one table
fn walkthrough(name: &str, table: &mut dyn HashTable<u64>) {
    println!("\n{name}");
    println!("{}", "-".repeat(name.len()));

    for i in 0..50 {
        table.put(format!("str{}", i / 3), i * 100);
        if i % 10 == 9 {
            print_stats(table);
        }
    }

    let keys: Vec<u64> = (25..1000).step_by(13).collect();
    for &key in &keys {
        table.put(key.to_string(), key * 42);
    }
    for capacity in (111..1000).step_by(117) {
        if let Err(err) = table.resize_table(capacity) {
            println!("  resize to {capacity} rejected: {err}");
            continue;
        }
        let all_present = keys.iter().all(|key| table.contains_key(&key.to_string()));
        let none_extra = keys.iter().all(|key| !table.contains_key(&(key + 1).to_string()));
        println!(
            "  resize {capacity}: consistent = {}, size = {}, capacity = {}, load = {:.2}",
            all_present && none_extra,
            table.size(),
            table.capacity(),
            table.table_load()
        );
    }

    if let Err(err) = table.resize_table(0) {
        println!("  resize to 0 rejected: {err}");
    }

    let removed = keys.iter().filter(|key| table.remove(&key.to_string()).is_some()).count();
    println!("  removed {removed} keys, {} left", table.keys().len());

    table.clear();
    print_stats(table);
}

// Inserts the same random keys into every configuration, recording the load after each put
fn record_loads(keys: &[String]) -> Vec<Series> {
    let mut all_series = Vec::new();

    for (name, mut table) in tables() {
        println!("\n{name}");
        let mut points = Vec::with_capacity(keys.len());
        for (inserted, key) in keys.iter().enumerate() {
            table.put(key.clone(), inserted as u64);
            points.push((inserted + 1, table.table_load()));
            if (inserted + 1).is_multiple_of(CHECKPOINT) {
                print_stats(table.as_ref());
            }
        }
        all_series.push(Series { name, points });
    }

    all_series
}

fn draw_chart(all_series: &[Series]) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(CHART_PATH, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Table Load While Inserting Random Keys", (FONT_FAMILY, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..KEY_COUNT, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Table Load (size / capacity)")
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()?;

    for (series_idx, series) in all_series.iter().enumerate() {
        let color = &COLORS[series_idx % COLORS.len()];
        let line_style = ShapeStyle::from(color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), line_style))?
            .label(series.name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for (name, mut table) in tables() {
        walkthrough(name, table.as_mut());
    }

    let (mode, frequency) = find_mode(["apple", "apple", "grape", "melon", "peach"]);
    println!("\nfind_mode: {mode:?}, frequency = {frequency}");

    let mut rng = rand::rng();
    let keys: Vec<String> =
        (0..KEY_COUNT).map(|_| format!("key{}", rng.random_range(0..1_000_000u32))).collect();

    let all_series = record_loads(&keys);
    draw_chart(&all_series)?;

    println!("\nGenerated plot image: {CHART_PATH}");
    Ok(())
}
