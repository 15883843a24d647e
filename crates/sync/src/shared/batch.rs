use std::num::NonZeroUsize;

/// Делит список на последовательные части по `size` элементов.
///
/// Все части, кроме последней, имеют длину ровно `size`; последняя содержит
/// остаток. Порядок сохраняется. Итератор ленивый, повторный вызов на тех же
/// данных даёт те же части.
///
/// # Примеры
/// ```
/// use std::num::NonZeroUsize;
/// use stock_sync::shared::batch::divide;
/// let parts: Vec<&[i32]> = divide(&[1, 2, 3, 4, 5], NonZeroUsize::new(2).unwrap()).collect();
/// assert_eq!(parts, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
/// ```
pub fn divide<T>(items: &[T], size: NonZeroUsize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.get())
}
