//! Example: Write a list of records to a CSV file

use lib_csv_records::{IoOptions, Record, RecordDescriptor, to_file};

#[derive(Debug, Default)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

impl Record for Position {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("x", |p| &p.x, |p| &mut p.x).column("pos_x");
        d.field("y", |p| &p.y, |p| &mut p.y).column("pos_y");
        d.field("z", |p| &p.z, |p| &mut p.z).column("pos_z");
    }
}

#[derive(Debug, Default)]
struct Placement {
    name: String,
    id: u32,
    position: Position,
    comment: String,
}

impl Record for Placement {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("name", |p| &p.name, |p| &mut p.name).column("name");
        d.field("id", |p| &p.id, |p| &mut p.id).column("l_id");
        d.record("position", |p| &p.position, |p| &mut p.position).embedded();
        d.field("comment", |p| &p.comment, |p| &mut p.comment).ignore();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let placements = vec![
        Placement {
            name: "Kinopio".to_string(),
            id: 0,
            position: Position {
                x: 0.0,
                y: 150.5,
                z: -20.0,
            },
            comment: "not exported".to_string(),
        },
        Placement {
            name: "Coin".to_string(),
            id: 1,
            position: Position {
                x: 12.25,
                y: 0.0,
                z: 3.0,
            },
            comment: String::new(),
        },
    ];

    to_file(&placements, "placements.csv", &IoOptions::default())?;
    println!("Exported {} placements to placements.csv", placements.len());

    Ok(())
}
