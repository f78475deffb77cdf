pub mod advertisement;
pub mod cart;
pub mod category;
pub mod currency;
pub mod order;
pub mod product;
pub mod user;

pub use advertisement::{Advertisement, NewAdvertisement};
pub use cart::{Cart, CartItem, NewCart, NewCartItem};
pub use category::{Category, NewCategory};
pub use currency::{CurrencyConversion, NewCurrencyConversion};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, NewProductCategory, Product, ProductCategory};
pub use user::{NewUser, User};
