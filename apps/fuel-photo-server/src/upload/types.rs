//! Upload types for the photo analysis request

use std::fmt;
use std::path::Path;

use axum::http::StatusCode;

use super::temp_file::TempImage;

// ============================================================================
// Image Roles
// ============================================================================

/// What a submitted photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Plate,
    Odometer,
    FuelPump,
    FuelPump2,
}

impl ImageRole {
    /// All roles in response order
    pub const ALL: [ImageRole; 4] = [
        ImageRole::Plate,
        ImageRole::Odometer,
        ImageRole::FuelPump,
        ImageRole::FuelPump2,
    ];

    /// Multipart field carrying this photo
    pub fn field_name(self) -> &'static str {
        match self {
            ImageRole::Plate => "plateImage",
            ImageRole::Odometer => "odometerImage",
            ImageRole::FuelPump => "fuelPumpImage",
            ImageRole::FuelPump2 => "fuelPumpImage2",
        }
    }

    /// Key of this photo's result in the response body
    pub fn response_key(self) -> &'static str {
        match self {
            ImageRole::Plate => "plateInfo",
            ImageRole::Odometer => "odometerInfo",
            ImageRole::FuelPump => "fuelPumpInfo",
            ImageRole::FuelPump2 => "fuelPump2Info",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.field_name() == name)
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

// ============================================================================
// Uploaded Images
// ============================================================================

/// One received photo, held in a temporary file until dropped
#[derive(Debug)]
pub struct UploadedImage {
    pub role: ImageRole,
    pub size: u64,
    file: TempImage,
}

impl UploadedImage {
    pub fn new(role: ImageRole, file: TempImage, size: u64) -> Self {
        Self { role, size, file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// The four photos of one request
#[derive(Debug)]
pub struct PhotoSet {
    pub plate: UploadedImage,
    pub odometer: UploadedImage,
    pub fuel_pump: UploadedImage,
    pub fuel_pump_2: UploadedImage,
}

impl PhotoSet {
    pub fn images(&self) -> [&UploadedImage; 4] {
        [&self.plate, &self.odometer, &self.fuel_pump, &self.fuel_pump_2]
    }
}

/// Collects photos as multipart fields arrive
#[derive(Debug, Default)]
pub struct PhotoSetBuilder {
    plate: Option<UploadedImage>,
    odometer: Option<UploadedImage>,
    fuel_pump: Option<UploadedImage>,
    fuel_pump_2: Option<UploadedImage>,
}

impl PhotoSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, role: ImageRole) -> &mut Option<UploadedImage> {
        match role {
            ImageRole::Plate => &mut self.plate,
            ImageRole::Odometer => &mut self.odometer,
            ImageRole::FuelPump => &mut self.fuel_pump,
            ImageRole::FuelPump2 => &mut self.fuel_pump_2,
        }
    }

    pub fn contains(&self, role: ImageRole) -> bool {
        match role {
            ImageRole::Plate => self.plate.is_some(),
            ImageRole::Odometer => self.odometer.is_some(),
            ImageRole::FuelPump => self.fuel_pump.is_some(),
            ImageRole::FuelPump2 => self.fuel_pump_2.is_some(),
        }
    }

    /// Each role accepts exactly one file.
    pub fn insert(&mut self, image: UploadedImage) -> Result<(), UploadError> {
        let slot = self.slot(image.role);
        if slot.is_some() {
            return Err(UploadError::DuplicatePart(image.role));
        }
        *slot = Some(image);
        Ok(())
    }

    pub fn build(self) -> Result<PhotoSet, UploadError> {
        let missing: Vec<ImageRole> = ImageRole::ALL
            .into_iter()
            .filter(|role| !self.contains(*role))
            .collect();

        match (self.plate, self.odometer, self.fuel_pump, self.fuel_pump_2) {
            (Some(plate), Some(odometer), Some(fuel_pump), Some(fuel_pump_2)) => Ok(PhotoSet {
                plate,
                odometer,
                fuel_pump,
                fuel_pump_2,
            }),
            _ => Err(UploadError::MissingParts(missing)),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Upload error types
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Missing image parts: {}", join_roles(.0))]
    MissingParts(Vec<ImageRole>),

    #[error("More than one file sent for {0}")]
    DuplicatePart(ImageRole),

    #[error("Invalid multipart body: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error("Failed to write temporary file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingParts(_) | UploadError::DuplicatePart(_) => StatusCode::BAD_REQUEST,
            UploadError::Multipart { status, .. } => *status,
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn join_roles(roles: &[ImageRole]) -> String {
    roles
        .iter()
        .map(|role| role.field_name())
        .collect::<Vec<_>>()
        .join(", ")
}
