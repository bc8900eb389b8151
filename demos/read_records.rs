//! Example: Read a CSV file into a list of records

use std::env;

use lib_csv_records::{IoOptions, Record, RecordDescriptor, from_file};

#[derive(Debug, Default)]
struct Placement {
    name: String,
    id: u32,
    x: f32,
    y: f32,
    z: f32,
}

impl Record for Placement {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("name", |p| &p.name, |p| &mut p.name).column("name");
        d.field("id", |p| &p.id, |p| &mut p.id).column("l_id");
        d.field("x", |p| &p.x, |p| &mut p.x).column("pos_x");
        d.field("y", |p| &p.y, |p| &mut p.y).column("pos_y");
        d.field("z", |p| &p.z, |p| &mut p.z).column("pos_z");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| "placements.csv".to_string());

    let mut placements: Vec<Placement> = Vec::new();
    from_file(&path, &mut placements, &IoOptions::default())?;

    println!("Placements: {}", placements.len());
    for p in &placements {
        println!("#{} {} at ({}, {}, {})", p.id, p.name, p.x, p.y, p.z);
    }

    Ok(())
}
