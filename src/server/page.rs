pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>BENEF report generator</title>
  <style>
    body { font-family: sans-serif; max-width: 36rem; margin: 2rem auto; }
    label { display: block; margin-top: 0.75rem; }
    input, select { width: 100%; padding: 0.3rem; }
    button { margin-top: 1.25rem; padding: 0.5rem 1.5rem; }
  </style>
</head>
<body>
  <h1>BENEF report generator</h1>
  <form action="/generate" method="post" enctype="multipart/form-data">
    <label>Country <input name="country" required placeholder="ES"></label>
    <label>Year <input name="year" required placeholder="2024"></label>
    <label>Month <input name="month" type="number" min="1" max="12" required></label>
    <label>Day <input name="day" type="number" min="1" max="31" required></label>
    <label>Language
      <select name="language">
        <option>English</option>
        <option>Spanish</option>
      </select>
    </label>
    <label>Segments
      <select name="segments">
        <option>Passenger Cars</option>
        <option>Light Commercial Vehicles</option>
      </select>
    </label>
    <label>Segmentation
      <select name="segmentation">
        <option>GENERIC</option>
        <option>VOLKSWAGEN</option>
      </select>
    </label>
    <label>Models workbook <input name="models_book" type="file" accept=".xlsx,.xlsm,.xls" required></label>
    <label>Brands workbook <input name="brands_book" type="file" accept=".xlsx,.xlsm,.xls" required></label>
    <button type="submit">Generate</button>
  </form>
</body>
</html>
"#;
