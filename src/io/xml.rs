//! Metadata XML documents read during product construction
//!
//! Only the handful of fields the catalog needs are mapped; everything else
//! in the documents is ignored by the deserializer.

use crate::types::{FloodError, FloodResult};
use quick_xml::de::from_str;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Processing flag value of a valid MUSCATE L2A product
pub const L2_VALID_FLAG: &str = "L2VALD";

/// Element text, ignoring any attributes on the element
#[derive(Debug, Deserialize)]
pub struct Text<T> {
    #[serde(rename = "$text")]
    pub value: T,
}

/// MUSCATE job processing information (`*JPI_ALL.xml`)
#[derive(Debug, Deserialize)]
pub struct JobProcessingInformation {
    #[serde(rename = "Processing_Flags_And_Modes_List", default)]
    pub flags_list: Option<ProcessingFlagsList>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingFlagsList {
    #[serde(rename = "Processing_Flags_And_Modes", default)]
    pub flags: Vec<ProcessingFlag>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingFlag {
    #[serde(rename = "Key", default)]
    pub key: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
}

impl JobProcessingInformation {
    pub fn flag_values(&self) -> impl Iterator<Item = &str> {
        self.flags_list
            .iter()
            .flat_map(|list| list.flags.iter())
            .filter_map(|flag| flag.value.as_deref())
    }

    /// True if any processing flag carries the L2 validity value
    pub fn is_l2_valid(&self) -> bool {
        self.flag_values().any(|v| v.trim() == L2_VALID_FLAG)
    }
}

/// Pleiades DIMAP document (`DIM_PHR*.XML`)
#[derive(Debug, Deserialize)]
pub struct DimapDocument {
    #[serde(rename = "Dataset_Identification")]
    pub dataset_identification: DatasetIdentification,
}

#[derive(Debug, Deserialize)]
pub struct DatasetIdentification {
    #[serde(rename = "DATASET_NAME")]
    pub dataset_name: Text<String>,
}

/// TerraSAR-X level-1b product annotation (`<scene>.xml`)
#[derive(Debug, Deserialize)]
pub struct TerraSarAnnotation {
    #[serde(rename = "productComponents")]
    pub product_components: ProductComponents,
    #[serde(rename = "productInfo")]
    pub product_info: TerraSarProductInfo,
}

#[derive(Debug, Deserialize)]
pub struct ProductComponents {
    #[serde(rename = "imageData", default)]
    pub image_data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub struct ImageData {
    pub file: ComponentFile,
}

#[derive(Debug, Deserialize)]
pub struct ComponentFile {
    pub location: FileLocation,
}

#[derive(Debug, Deserialize)]
pub struct FileLocation {
    #[serde(default)]
    pub path: Option<String>,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct TerraSarProductInfo {
    #[serde(rename = "missionInfo")]
    pub mission_info: MissionInfo,
    #[serde(rename = "imageDataInfo")]
    pub image_data_info: ImageDataInfo,
}

#[derive(Debug, Deserialize)]
pub struct MissionInfo {
    #[serde(rename = "relOrbit")]
    pub rel_orbit: u32,
}

#[derive(Debug, Deserialize)]
pub struct ImageDataInfo {
    #[serde(rename = "imageRaster")]
    pub image_raster: ImageRaster,
}

#[derive(Debug, Deserialize)]
pub struct ImageRaster {
    #[serde(rename = "rowSpacing")]
    pub row_spacing: Text<f64>,
}

impl TerraSarAnnotation {
    /// Image file names listed in the annotation, relative to the scene root
    pub fn image_files(&self) -> Vec<String> {
        self.product_components
            .image_data
            .iter()
            .map(|data| match &data.file.location.path {
                Some(dir) if !dir.trim().is_empty() => {
                    format!("{}/{}", dir.trim(), data.file.location.filename.trim())
                }
                _ => data.file.location.filename.trim().to_string(),
            })
            .collect()
    }
}

/// Parse an XML string into one of the documents above
pub fn parse_document<T: DeserializeOwned>(xml_content: &str) -> FloodResult<T> {
    from_str::<T>(xml_content).map_err(|e| FloodError::Xml(e.to_string()))
}

/// Read and parse an XML file
pub fn read_document<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> FloodResult<T> {
    let path = path.as_ref();
    log::debug!("Reading metadata document: {}", path.display());
    let content = fs::read_to_string(path)?;
    from_str::<T>(&content)
        .map_err(|e| FloodError::Xml(format!("Failed to parse {}: {}", path.display(), e)))
}
