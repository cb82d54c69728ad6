use bpg_rs::{ChannelLayout, Error, NativeBuffer, NativeImage, PixelRecord};
use libc::c_int;
use std::mem::{align_of, offset_of, size_of};

fn native_image(w: c_int, h: c_int, pixel_len: c_int, data: &mut [c_int]) -> NativeImage {
    NativeImage {
        w,
        h,
        pixel_len,
        has_alpha: c_int::from(pixel_len == 4),
        is_grayscale: c_int::from(pixel_len == 1),
        raw_data: data.as_mut_ptr(),
    }
}

#[test]
fn test_layout_matches_c_struct() {
    let int = size_of::<c_int>();
    assert_eq!(offset_of!(NativeImage, w), 0);
    assert_eq!(offset_of!(NativeImage, h), int);
    assert_eq!(offset_of!(NativeImage, pixel_len), 2 * int);
    assert_eq!(offset_of!(NativeImage, has_alpha), 3 * int);
    assert_eq!(offset_of!(NativeImage, is_grayscale), 4 * int);

    let ptr = size_of::<*mut c_int>();
    let raw_data = (5 * int).div_ceil(align_of::<*mut c_int>()) * align_of::<*mut c_int>();
    assert_eq!(offset_of!(NativeImage, raw_data), raw_data);
    assert_eq!(size_of::<NativeImage>(), raw_data + ptr);
}

#[test]
fn test_zero_image() {
    let image = NativeImage::zero();
    assert_eq!((image.w, image.h, image.pixel_len), (0, 0, 0));
    assert!(image.raw_data.is_null());
}

#[test]
fn test_from_native_copies_samples() {
    let mut data: Vec<c_int> = (0..24).collect();
    let image = native_image(3, 2, 4, &mut data);

    let record = unsafe { PixelRecord::from_native(&image) }.unwrap();
    assert_eq!(record.width(), 3);
    assert_eq!(record.height(), 2);
    assert_eq!(record.layout(), ChannelLayout::Rgba);
    assert_eq!(record.samples(), data.as_slice());
}

#[test]
fn test_from_native_rejects_inconsistent_flags() {
    let mut data = vec![0; 12];
    let mut image = native_image(2, 2, 3, &mut data);
    image.has_alpha = 1;
    let result = unsafe { PixelRecord::from_native(&image) };
    assert!(matches!(result, Err(Error::MalformedRecord(_))));

    let mut data = vec![0; 4];
    let mut image = native_image(2, 2, 1, &mut data);
    image.is_grayscale = 0;
    let result = unsafe { PixelRecord::from_native(&image) };
    assert!(matches!(result, Err(Error::MalformedRecord(_))));
}

#[test]
fn test_from_native_rejects_bad_shape() {
    let mut data = vec![0; 8];
    let image = native_image(2, 2, 2, &mut data);
    assert!(matches!(
        unsafe { PixelRecord::from_native(&image) },
        Err(Error::MalformedRecord(_))
    ));

    let image = native_image(-1, 2, 1, &mut data);
    assert!(matches!(
        unsafe { PixelRecord::from_native(&image) },
        Err(Error::MalformedRecord(_))
    ));

    let mut image = native_image(2, 2, 1, &mut data);
    image.raw_data = std::ptr::null_mut();
    assert!(matches!(
        unsafe { PixelRecord::from_native(&image) },
        Err(Error::MalformedRecord(_))
    ));
}

#[test]
fn test_native_buffer_projects_flags() {
    let record = PixelRecord::new(2, 1, ChannelLayout::Gray, vec![7, 9]).unwrap();
    let mut buffer = NativeBuffer::new(&record);

    let image = *buffer.image();
    assert_eq!((image.w, image.h, image.pixel_len), (2, 1, 1));
    assert_eq!((image.has_alpha, image.is_grayscale), (0, 1));
    assert_eq!(buffer.samples(), &[7, 9]);

    let ptr = buffer.as_mut_ptr();
    let back = unsafe { PixelRecord::from_native(&*ptr) }.unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_native_buffer_rgba_flags() {
    let record = PixelRecord::new(1, 1, ChannelLayout::Rgba, vec![1, 2, 3, 4]).unwrap();
    let buffer = NativeBuffer::new(&record);
    assert_eq!(buffer.image().has_alpha, 1);
    assert_eq!(buffer.image().is_grayscale, 0);
    assert_eq!(buffer.image().pixel_len, 4);
}
