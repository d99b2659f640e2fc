// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared ROS-style message types for integration tests.

#![allow(dead_code)]

use cdrcodec::{
    CdrDecode, CdrEncode, CdrType, Decoder, ElementType, Encoder, FloatType, IntegerType,
    RecordShape, Result, Shape,
};

/// `Temperature` sample captured from a ROV sensor, as documented by the
/// `ms5837` driver: zero stamp, empty frame id, 23.456 degrees.
pub const TEMPERATURE_DUMP: [u8; 44] = [
    0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0xdb, 0xf9, 0x7e, 0x6a, //
    0xbc, 0x74, 0x37, 0x40, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, //
    0x6d, 0x73, 0x35, 0x38, 0x33, 0x37, 0x00, 0x00,
];

const UINT32: Shape = Shape::Integer(IntegerType::UInt32);
const FLOAT64: Shape = Shape::Float(FloatType::Float64);

// ============================================================================
// builtin_interfaces / std_msgs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl CdrType for Time {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Time")
                .field("sec", Shape::Integer(IntegerType::Int32))
                .field("nanosec", UINT32)
                .build(),
        )
    }
}

impl CdrEncode for Time {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.sec)?;
        record.encode_field(1, &self.nanosec)
    }
}

impl CdrDecode for Time {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Time {
            sec: record.decode_field(0)?,
            nanosec: record.decode_field(1)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

impl CdrType for Header {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Header")
                .field("stamp", Time::describe_shape())
                .field("frame_id", Shape::String)
                .build(),
        )
    }
}

impl CdrEncode for Header {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.stamp)?;
        record.encode_field(1, &self.frame_id)
    }
}

impl CdrDecode for Header {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Header {
            stamp: record.decode_field(0)?,
            frame_id: record.decode_field(1)?,
        })
    }
}

// ============================================================================
// sensor_msgs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionOfInterest {
    pub x_offset: u32,
    pub y_offset: u32,
    pub height: u32,
    pub width: u32,
    pub do_rectify: bool,
}

impl CdrType for RegionOfInterest {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("RegionOfInterest")
                .field("x_offset", UINT32)
                .field("y_offset", UINT32)
                .field("height", UINT32)
                .field("width", UINT32)
                .field("do_rectify", Shape::Bool)
                .build(),
        )
    }
}

impl CdrEncode for RegionOfInterest {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.x_offset)?;
        record.encode_field(1, &self.y_offset)?;
        record.encode_field(2, &self.height)?;
        record.encode_field(3, &self.width)?;
        record.encode_field(4, &self.do_rectify)
    }
}

impl CdrDecode for RegionOfInterest {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(RegionOfInterest {
            x_offset: record.decode_field(0)?,
            y_offset: record.decode_field(1)?,
            height: record.decode_field(2)?,
            width: record.decode_field(3)?,
            do_rectify: record.decode_field(4)?,
        })
    }
}

/// `sensor_msgs/CameraInfo`, with `k`, `r` and `p` declared the way
/// generated message types declare them: as vectors marked fixed in the
/// record metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInfo {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub distortion_model: String,
    pub d: Vec<f64>,
    pub k: Vec<f64>,
    pub r: Vec<f64>,
    pub p: Vec<f64>,
    pub binning_x: u32,
    pub binning_y: u32,
    pub roi: RegionOfInterest,
}

impl CdrType for CameraInfo {
    fn describe_shape() -> Shape {
        let float64 = ElementType::Float(FloatType::Float64);
        Shape::record(
            RecordShape::builder("CameraInfo")
                .field("header", Header::describe_shape())
                .field("height", UINT32)
                .field("width", UINT32)
                .field("distortion_model", Shape::String)
                .field("d", Shape::DynamicArray(float64))
                .fixed_field("k", float64, 9)
                .fixed_field("r", float64, 9)
                .fixed_field("p", float64, 12)
                .field("binning_x", UINT32)
                .field("binning_y", UINT32)
                .field("roi", RegionOfInterest::describe_shape())
                .build(),
        )
    }
}

impl CdrEncode for CameraInfo {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.header)?;
        record.encode_field(1, &self.height)?;
        record.encode_field(2, &self.width)?;
        record.encode_field(3, &self.distortion_model)?;
        record.encode_field(4, &self.d)?;
        record.encode_field(5, &self.k)?;
        record.encode_field(6, &self.r)?;
        record.encode_field(7, &self.p)?;
        record.encode_field(8, &self.binning_x)?;
        record.encode_field(9, &self.binning_y)?;
        record.encode_field(10, &self.roi)
    }
}

impl CdrDecode for CameraInfo {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(CameraInfo {
            header: record.decode_field(0)?,
            height: record.decode_field(1)?,
            width: record.decode_field(2)?,
            distortion_model: record.decode_field(3)?,
            d: record.decode_field(4)?,
            k: record.decode_field(5)?,
            r: record.decode_field(6)?,
            p: record.decode_field(7)?,
            binning_x: record.decode_field(8)?,
            binning_y: record.decode_field(9)?,
            roi: record.decode_field(10)?,
        })
    }
}

// ============================================================================
// Temperature
// ============================================================================

/// Temperature message with the header fields inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTemperature {
    pub sec: i32,
    pub nanosec: u32,
    pub frame_id: String,
    pub temperature: f64,
    pub variance: f64,
    pub id: String,
}

impl CdrType for FlatTemperature {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("FlatTemperature")
                .field("sec", Shape::Integer(IntegerType::Int32))
                .field("nanosec", UINT32)
                .field("frame_id", Shape::String)
                .field("temperature", FLOAT64)
                .field("variance", FLOAT64)
                .field("id", Shape::String)
                .build(),
        )
    }
}

impl CdrEncode for FlatTemperature {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.sec)?;
        record.encode_field(1, &self.nanosec)?;
        record.encode_field(2, &self.frame_id)?;
        record.encode_field(3, &self.temperature)?;
        record.encode_field(4, &self.variance)?;
        record.encode_field(5, &self.id)
    }
}

impl CdrDecode for FlatTemperature {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(FlatTemperature {
            sec: record.decode_field(0)?,
            nanosec: record.decode_field(1)?,
            frame_id: record.decode_field(2)?,
            temperature: record.decode_field(3)?,
            variance: record.decode_field(4)?,
            id: record.decode_field(5)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub header: Header,
    pub temperature: f64,
    pub variance: f64,
}

impl CdrType for TemperatureReading {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("TemperatureReading")
                .field("header", Header::describe_shape())
                .field("temperature", FLOAT64)
                .field("variance", FLOAT64)
                .build(),
        )
    }
}

impl CdrEncode for TemperatureReading {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.header)?;
        record.encode_field(1, &self.temperature)?;
        record.encode_field(2, &self.variance)
    }
}

impl CdrDecode for TemperatureReading {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(TemperatureReading {
            header: record.decode_field(0)?,
            temperature: record.decode_field(1)?,
            variance: record.decode_field(2)?,
        })
    }
}

/// Temperature message keyed by sensor id.
#[derive(Debug, Clone, PartialEq)]
pub struct Temperature {
    pub reading: TemperatureReading,
    pub id: String,
}

impl CdrType for Temperature {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Temperature")
                .field("reading", TemperatureReading::describe_shape())
                .field("id", Shape::String)
                .build(),
        )
    }
}

impl CdrEncode for Temperature {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.reading)?;
        record.encode_field(1, &self.id)
    }
}

impl CdrDecode for Temperature {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Temperature {
            reading: record.decode_field(0)?,
            id: record.decode_field(1)?,
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn sample_flat_temperature() -> FlatTemperature {
    FlatTemperature {
        sec: 0,
        nanosec: 0,
        frame_id: String::new(),
        temperature: 23.456,
        variance: 0.0,
        id: "ms5837".to_string(),
    }
}

pub fn sample_temperature() -> Temperature {
    Temperature {
        reading: TemperatureReading {
            header: Header::default(),
            temperature: 23.456,
            variance: 0.0,
        },
        id: "ms5837".to_string(),
    }
}

pub fn sample_camera_info() -> CameraInfo {
    CameraInfo {
        header: Header {
            stamp: Time {
                sec: 1_700_000_000,
                nanosec: 123_456_789,
            },
            frame_id: "camera_optical_frame".to_string(),
        },
        height: 480,
        width: 640,
        distortion_model: "plumb_bob".to_string(),
        d: vec![-0.28, 0.07, 0.0002, 0.00002, 0.0],
        k: vec![525.0, 0.0, 319.5, 0.0, 525.0, 239.5, 0.0, 0.0, 1.0],
        r: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        p: vec![
            525.0, 0.0, 319.5, 0.0, 0.0, 525.0, 239.5, 0.0, 0.0, 0.0, 1.0, 0.0,
        ],
        binning_x: 1,
        binning_y: 1,
        roi: RegionOfInterest {
            x_offset: 0,
            y_offset: 0,
            height: 480,
            width: 640,
            do_rectify: true,
        },
    }
}
