//! # ページネーション
//!
//! 1 始まりのページ番号とページサイズから `LIMIT` / `OFFSET` を計算する。

use serde::{Deserialize, Serialize};

/// ページ指定
///
/// ページ番号は 1 始まり。`offset = (page - 1) * page_size`。
/// ページ番号 0 はページ 1 として扱う（負のオフセットは作らない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
   page:      u32,
   page_size: u32,
}

impl PageRequest {
   pub fn new(page: u32, page_size: u32) -> Self {
      Self { page, page_size }
   }

   /// 任意指定のページ番号・ページサイズから組み立てる
   ///
   /// どちらかが欠けている場合は `None`（ページングしない）を返す。
   pub fn from_parts(page: Option<u32>, page_size: Option<u32>) -> Option<Self> {
      Some(Self::new(page?, page_size?))
   }

   pub fn page(&self) -> u32 {
      self.page
   }

   pub fn page_size(&self) -> u32 {
      self.page_size
   }

   /// `LIMIT` に渡す値
   pub fn limit(&self) -> u64 {
      u64::from(self.page_size)
   }

   /// `OFFSET` に渡す値
   pub fn offset(&self) -> u64 {
      u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case(Some(1), None)]
   #[case(None, Some(10))]
   #[case(None, None)]
   fn test_from_partsはどちらかが欠けるとnoneを返す(
      #[case] page: Option<u32>,
      #[case] page_size: Option<u32>,
   ) {
      assert_eq!(PageRequest::from_parts(page, page_size), None);
   }

   #[test]
   fn test_from_partsは両方揃うとページ指定を返す() {
      assert_eq!(
         PageRequest::from_parts(Some(2), Some(10)),
         Some(PageRequest::new(2, 10))
      );
   }

   #[rstest]
   #[case(1, 10, 0)]
   #[case(2, 10, 10)]
   #[case(3, 25, 50)]
   #[case(0, 10, 0)]
   fn test_offsetは1始まりのページ番号から計算される(
      #[case] page: u32,
      #[case] page_size: u32,
      #[case] expected: u64,
   ) {
      let sut = PageRequest::new(page, page_size);
      assert_eq!(sut.offset(), expected);
      assert_eq!(sut.limit(), u64::from(page_size));
   }

   #[test]
   fn test_offsetはu32の積でもオーバーフローしない() {
      let sut = PageRequest::new(u32::MAX, u32::MAX);
      assert_eq!(sut.offset(), u64::from(u32::MAX - 1) * u64::from(u32::MAX));
   }
}
