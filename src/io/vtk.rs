//! VTK output for cell data on the Cartesian grid.
//!
//! Writes VTI (XML ImageData) files for visualization in ParaView and other
//! VTK-compatible tools. Each variable becomes one cell-data array over the
//! interior cells; ghost cells are not written.
//!
//! # Example
//!
//! ```ignore
//! use fvm_rs::io::VtkWriter;
//!
//! simulator.add_writer(Box::new(VtkWriter::new("output/sod")));
//! // output/sod_0.vti, output/sod_1.vti, ...
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Writer, output_name};
use crate::error::Result;
use crate::grid::Grid;
use crate::simulator::TimestepInformation;
use crate::volume::Volume;

/// VTK XML writer helper.
struct XmlWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> XmlWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"ImageData\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn write_data_array(&mut self, name: &str, data: &[f64]) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
            name
        )?;
        self.indent += 1;
        self.write_indent()?;
        for (i, &v) in data.iter().enumerate() {
            write!(self.writer, "{:.10e}", v)?;
            if i + 1 < data.len() {
                write!(self.writer, " ")?;
            }
            // Line break every 6 values for readability
            if (i + 1) % 6 == 0 && i + 1 < data.len() {
                writeln!(self.writer)?;
                self.write_indent()?;
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        Ok(())
    }

    fn write_field_data(&mut self, name: &str, value: f64) -> std::io::Result<()> {
        self.start_element("FieldData", &[])?;
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" Name=\"{}\" NumberOfTuples=\"1\" format=\"ascii\">",
            name
        )?;
        self.indent += 1;
        self.write_indent()?;
        writeln!(self.writer, "{:.10e}", value)?;
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        self.end_element("FieldData")?;
        Ok(())
    }
}

fn join3<T: std::fmt::Display>(values: [T; 3]) -> String {
    format!("{} {} {}", values[0], values[1], values[2])
}

/// Write the interior cells of every variable of `volume` to a VTI file.
pub fn write_vti(path: impl AsRef<Path>, volume: &Volume, grid: &Grid, time: f64) -> Result<()> {
    let cells = volume.interior_box().flat_indices();
    let n = grid.dimensions();
    let extent = format!("0 {} 0 {} 0 {}", n.x, n.y, n.z);
    let origin = join3(grid.origin().to_array());
    let spacing = join3(grid.cell_lengths().to_array());

    let file = File::create(path)?;
    let mut writer = XmlWriter::new(file);

    writer.write_header()?;
    writer.start_element(
        "ImageData",
        &[("WholeExtent", &extent), ("Origin", &origin), ("Spacing", &spacing)],
    )?;
    writer.write_field_data("TimeValue", time)?;
    writer.start_element("Piece", &[("Extent", &extent)])?;

    let first = volume.variable_names().first().cloned().unwrap_or_default();
    writer.start_element("CellData", &[("Scalars", &first)])?;
    for (v, name) in volume.variable_names().iter().enumerate() {
        let data = volume.copy_to_host(v)?;
        let interior: Vec<f64> = cells.iter().map(|&cell| data[cell]).collect();
        writer.write_data_array(name, &interior)?;
    }
    writer.end_element("CellData")?;

    writer.end_element("Piece")?;
    writer.end_element("ImageData")?;
    writer.write_footer()?;
    Ok(())
}

/// Writes every snapshot it receives to `{base}_{snapshot}.vti`.
#[derive(Clone, Debug)]
pub struct VtkWriter {
    base_path: PathBuf,
    snapshot: usize,
}

impl VtkWriter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            snapshot: 0,
        }
    }

    /// Path of snapshot `snapshot`.
    pub fn snapshot_path(&self, snapshot: usize) -> PathBuf {
        let stem = self.base_path.file_name().unwrap_or_default().to_string_lossy();
        let parent = self.base_path.parent().unwrap_or(Path::new("."));
        parent.join(format!("{}.vti", output_name(&stem, snapshot)))
    }
}

impl Writer for VtkWriter {
    fn write(&mut self, volume: &Volume, grid: &Grid, timestep_information: &TimestepInformation) -> Result<()> {
        let path = self.snapshot_path(self.snapshot);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        write_vti(&path, volume, grid, timestep_information.current_time())?;
        debug!(path = %path.display(), "wrote VTK snapshot");
        self.snapshot += 1;
        Ok(())
    }
}
