use ndarray::ArrayView3;

/// An RGB image or video frame: contiguous bytes in row-major order.
///
/// Pixel format conversion happens at I/O and tensor boundaries; alignment
/// and stylization code treats the buffer as packed RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A black RGB frame.
    pub fn black(width: u32, height: u32) -> Self {
        Self::new(vec![0; width as usize * height as usize * 3], width, height, 3, 0)
    }

    pub fn from_rgb_image(img: image::RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3, index)
    }

    /// Converts to an `image` buffer; `None` if the frame is not 3-channel.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        if self.channels != 3 {
            return None;
        }
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Copies the `[x, x+w) × [y, y+h)` window; the window must lie inside the frame.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Frame {
        debug_assert!(x + w <= self.width && y + h <= self.height);
        let c = self.channels as usize;
        let row_len = w as usize * c;
        let mut out = Vec::with_capacity(row_len * h as usize);
        for row in y as usize..(y + h) as usize {
            let start = (row * self.width as usize + x as usize) * c;
            out.extend_from_slice(&self.data[start..start + row_len]);
        }
        Frame::new(out, w, h, self.channels, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Frame {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[x as u8, y as u8, 7]);
            }
        }
        Frame::new(data, w, h, 3, 4)
    }

    #[test]
    fn test_construction_and_accessors() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_black_frame_is_zeroed_rgb() {
        let frame = Frame::black(4, 3);
        assert_eq!(frame.data().len(), 36);
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_crop_copies_window() {
        let frame = gradient(8, 6);
        let crop = frame.crop(2, 1, 3, 4);
        assert_eq!((crop.width(), crop.height()), (3, 4));
        let arr = crop.as_ndarray();
        assert_eq!(arr[[0, 0, 0]], 2);
        assert_eq!(arr[[0, 0, 1]], 1);
        assert_eq!(arr[[3, 2, 0]], 4);
        assert_eq!(arr[[3, 2, 1]], 4);
        assert_eq!(crop.index(), 4);
    }

    #[test]
    fn test_rgb_image_conversion_preserves_pixels() {
        let frame = gradient(5, 3);
        let img = frame.to_rgb_image().unwrap();
        assert_eq!(img.get_pixel(4, 2).0, [4, 2, 7]);
        let back = Frame::from_rgb_image(img, 9);
        assert_eq!(back.data(), frame.data());
        assert_eq!(back.index(), 9);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 24], 4, 2, 3, 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]);
    }
}
